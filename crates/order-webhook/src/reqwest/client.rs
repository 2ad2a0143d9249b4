//! Reqwest-based HTTP client for webhook delivery.

use std::fmt::Write as _;
use std::sync::Arc;

use jiff::Timestamp;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};
use reqwest::{Client, StatusCode, Version};

use super::{ReqwestConfig, Result, TRACING_TARGET};
use crate::response::HEADER_BODY_SEPARATOR;
use crate::{WebhookProvider, WebhookRequest, WebhookResponse, WebhookService};

/// Inner client that holds the HTTP client and configuration.
struct ReqwestClientInner {
    http: Client,
    config: ReqwestConfig,
}

/// Reqwest-based HTTP client for delivering order payloads to webhook endpoints.
///
/// The client never sends `Expect: 100-continue`, so responses never carry an
/// interim `100 Continue` block ahead of the final status line.
///
/// # Examples
///
/// ```rust,ignore
/// use order_webhook::reqwest::{ReqwestClient, ReqwestConfig};
///
/// let client = ReqwestClient::new(ReqwestConfig::default())?;
/// let response = client.deliver(&request).await?;
/// ```
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new reqwest client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ReqwestConfig) -> Result<Self> {
        let connect_timeout = config.effective_connect_timeout();
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            connect_timeout_ms = connect_timeout.as_millis(),
            timeout_ms = timeout.as_millis(),
            "Creating reqwest client"
        );

        if config.accept_invalid_certs {
            tracing::warn!(
                target: TRACING_TARGET,
                "TLS certificate verification is disabled for webhook delivery"
            );
        }

        let http = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .user_agent(&user_agent)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let inner = ReqwestClientInner { http, config };
        let client = Self {
            inner: Arc::new(inner),
        };

        tracing::info!(
            target: TRACING_TARGET,
            "Reqwest client created successfully"
        );

        Ok(client)
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Converts this client into a [`WebhookService`] for use with dependency injection.
    pub fn into_service(self) -> WebhookService {
        WebhookService::new(self)
    }

    async fn send(&self, request: &WebhookRequest) -> Result<(u16, String)> {
        let http_response = self
            .inner
            .http
            .post(request.url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, request.content_length())
            .body(request.body.clone())
            .send()
            .await?;

        let version = http_response.version();
        let status = http_response.status();
        let headers = http_response.headers().clone();

        let body = match http_response.text().await {
            Ok(body) => Some(body),
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    status_code = status.as_u16(),
                    error = %err,
                    "Failed to read webhook response body"
                );
                None
            }
        };

        let raw = render_raw_response(version, status, &headers, body.as_deref());
        Ok((status.as_u16(), raw))
    }
}

/// Renders a response the way it appeared on the wire.
///
/// The status line and headers form the header block, followed by a blank
/// line and the body. Without a body the blank line is omitted as well.
pub fn render_raw_response(
    version: Version,
    status: StatusCode,
    headers: &HeaderMap,
    body: Option<&str>,
) -> String {
    let mut raw = format!("{version:?} {status}");
    for (name, value) in headers {
        let _ = write!(raw, "\r\n{}: {}", name, String::from_utf8_lossy(value.as_bytes()));
    }

    if let Some(body) = body {
        raw.push_str(HEADER_BODY_SEPARATOR);
        raw.push_str(body);
    }

    raw
}

#[async_trait::async_trait]
impl WebhookProvider for ReqwestClient {
    async fn deliver(&self, request: &WebhookRequest) -> crate::Result<WebhookResponse> {
        let started_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            url = %request.url,
            content_length = request.content_length(),
            "Posting order payload"
        );

        let (status_code, raw) = self.send(request).await.map_err(crate::Error::from)?;
        let response = WebhookResponse::new(request.request_id, status_code, raw, started_at);

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            status_code,
            success = response.is_success(),
            "Webhook delivery completed"
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::DeliveryResult;

    #[test]
    fn test_client_creation() {
        let client = ReqwestClient::new(ReqwestConfig::default()).unwrap();
        assert!(client.config().user_agent.is_none());
        assert!(!client.config().accept_invalid_certs);
    }

    #[test]
    fn test_insecure_client_creation() {
        let config = ReqwestConfig::default().with_accept_invalid_certs(true);
        let client = ReqwestClient::new(config).unwrap();
        assert!(client.config().accept_invalid_certs);
    }

    #[test]
    fn test_render_raw_response() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let raw = render_raw_response(Version::HTTP_11, StatusCode::OK, &headers, Some("OK"));
        assert_eq!(raw, "HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\n\r\nOK");

        let result = DeliveryResult::from_raw(200, &raw);
        assert_eq!(result.body, "OK");
    }

    #[test]
    fn test_render_without_body_is_unexpected() {
        let raw = render_raw_response(
            Version::HTTP_11,
            StatusCode::BAD_GATEWAY,
            &HeaderMap::new(),
            None,
        );
        assert_eq!(raw, "HTTP/1.1 502 Bad Gateway");

        let result = DeliveryResult::from_raw(502, &raw);
        assert_eq!(result.body, crate::response::UNEXPECTED_RESPONSE);
    }

    /// Accepts one connection, answers it with `response` and returns the
    /// request exactly as it was received.
    async fn serve_once(listener: TcpListener, response: &'static str) -> String {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&received);
            if let Some((head, body)) = text.split_once(HEADER_BODY_SEPARATOR) {
                let length = head
                    .lines()
                    .find_map(|line| {
                        let line = line.to_ascii_lowercase();
                        line.strip_prefix("content-length:")
                            .map(|value| value.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if body.len() >= length {
                    break;
                }
            }
        }

        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        String::from_utf8(received).unwrap()
    }

    #[tokio::test]
    async fn test_delivers_json_over_the_wire() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_once(
            listener,
            "HTTP/1.1 201 Created\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK",
        ));

        let body = r#"{"name":"Zoë"}"#;
        let url = url::Url::parse(&format!("http://{address}/orders")).unwrap();
        let request = WebhookRequest::new(url, 1001, body.as_bytes().to_vec());

        let client = ReqwestClient::new(ReqwestConfig::default()).unwrap();
        let response = client.deliver(&request).await.unwrap();
        let received = server.await.unwrap();

        let (head, sent_body) = received.split_once(HEADER_BODY_SEPARATOR).unwrap();
        let head = head.to_ascii_lowercase();
        assert!(head.starts_with("post /orders http/1.1\r\n"));
        assert!(head.contains("content-type: application/json\r\n"));
        assert!(head.contains(&format!("content-length: {}\r\n", body.len())));
        assert!(!head.contains("expect:"));
        assert_eq!(sent_body, body);

        assert_eq!(response.status_code, 201);
        let result = DeliveryResult::from(&response);
        assert_eq!(result.status, 201);
        assert_eq!(result.body, "OK");
        assert!(
            result
                .header
                .as_deref()
                .is_some_and(|header| header.starts_with("HTTP/1.1 201 Created"))
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let config = ReqwestConfig::default().with_connect_timeout(1).with_timeout(2);
        let client = ReqwestClient::new(config).unwrap();

        let url = url::Url::parse("http://127.0.0.1:1/orders").unwrap();
        let request = WebhookRequest::new(url, 1, b"{}".to_vec());

        let error = client.deliver(&request).await.unwrap_err();
        assert!(matches!(
            error.kind(),
            crate::ErrorKind::NetworkError | crate::ErrorKind::Timeout
        ));
    }
}
