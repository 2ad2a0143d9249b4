//! Webhook delivery response types.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separator between the header block and the body of a raw HTTP response.
pub const HEADER_BODY_SEPARATOR: &str = "\r\n\r\n";

/// Body recorded when a raw response cannot be split into header and body.
pub const UNEXPECTED_RESPONSE: &str = "Unexpected response";

/// Prefix of the status history comment written after a delivery.
pub const COMMENT_PREFIX: &str = "GoMedia Web Hook";

/// Response from a webhook delivery attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// Request ID this response corresponds to.
    pub request_id: Uuid,
    /// HTTP status code from the webhook endpoint.
    pub status_code: u16,
    /// Raw response text: status line and headers, a blank line, then the body.
    pub raw: String,
    /// Timestamp when the request was initiated.
    pub started_at: Timestamp,
    /// Timestamp when the response was received.
    pub finished_at: Timestamp,
}

impl WebhookResponse {
    /// Creates a new webhook response.
    pub fn new(
        request_id: Uuid,
        status_code: u16,
        raw: impl Into<String>,
        started_at: Timestamp,
    ) -> Self {
        Self {
            request_id,
            status_code,
            raw: raw.into(),
            started_at,
            finished_at: Timestamp::now(),
        }
    }

    /// Returns whether the delivery was successful (2xx status code).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Time between sending the request and receiving the response.
    pub fn duration(&self) -> SignedDuration {
        self.finished_at.duration_since(self.started_at)
    }
}

/// Outcome of one send attempt, as recorded on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    /// HTTP status code, `0` when no response was received.
    pub status: u16,
    /// Response header block, when the raw response could be split.
    pub header: Option<String>,
    /// Response body, or [`UNEXPECTED_RESPONSE`].
    pub body: String,
}

impl DeliveryResult {
    /// Splits a raw response at the first blank line.
    ///
    /// Anything that does not split into exactly a header block and a body
    /// is recorded with the [`UNEXPECTED_RESPONSE`] placeholder.
    pub fn from_raw(status: u16, raw: &str) -> Self {
        match raw.split_once(HEADER_BODY_SEPARATOR) {
            Some((header, body)) => Self {
                status,
                header: Some(header.to_owned()),
                body: body.to_owned(),
            },
            None => Self::unexpected(status),
        }
    }

    /// Result for a response that could not be read.
    pub fn unexpected(status: u16) -> Self {
        Self {
            status,
            header: None,
            body: UNEXPECTED_RESPONSE.to_owned(),
        }
    }

    /// Result for a request that never produced a response.
    pub fn not_delivered() -> Self {
        Self::unexpected(0)
    }

    /// Renders the status history comment for this result.
    pub fn to_comment(&self) -> String {
        format!(
            "{COMMENT_PREFIX}: Sent, Status: {} Response: {}",
            self.status, self.body
        )
    }
}

impl From<&WebhookResponse> for DeliveryResult {
    fn from(response: &WebhookResponse) -> Self {
        Self::from_raw(response.status_code, &response.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_raw_response() {
        let raw = "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nOK";
        let result = DeliveryResult::from_raw(200, raw);

        assert_eq!(result.status, 200);
        assert_eq!(
            result.header.as_deref(),
            Some("HTTP/1.1 200 OK\r\nContent-Type: text/plain")
        );
        assert_eq!(result.body, "OK");
    }

    #[test]
    fn test_garbage_is_unexpected() {
        let result = DeliveryResult::from_raw(200, "garbage");

        assert_eq!(result.status, 200);
        assert!(result.header.is_none());
        assert_eq!(result.body, UNEXPECTED_RESPONSE);
    }

    #[test]
    fn test_split_only_at_first_blank_line() {
        let raw = "HTTP/1.1 200 OK\r\n\r\nline one\r\n\r\nline two";
        let result = DeliveryResult::from_raw(200, raw);

        assert_eq!(result.header.as_deref(), Some("HTTP/1.1 200 OK"));
        assert_eq!(result.body, "line one\r\n\r\nline two");
    }

    #[test]
    fn test_empty_body_is_kept() {
        let result = DeliveryResult::from_raw(204, "HTTP/1.1 204 No Content\r\n\r\n");

        assert_eq!(result.body, "");
        assert!(result.header.is_some());
    }

    #[test]
    fn test_not_delivered() {
        let result = DeliveryResult::not_delivered();

        assert_eq!(result.status, 0);
        assert_eq!(result.body, UNEXPECTED_RESPONSE);
        assert_eq!(
            result.to_comment(),
            "GoMedia Web Hook: Sent, Status: 0 Response: Unexpected response"
        );
    }

    #[test]
    fn test_to_comment() {
        let result = DeliveryResult::from_raw(201, "HTTP/1.1 201 Created\r\n\r\naccepted");

        assert_eq!(
            result.to_comment(),
            "GoMedia Web Hook: Sent, Status: 201 Response: accepted"
        );
    }

    #[test]
    fn test_response_is_success() {
        let started_at = Timestamp::now();

        assert!(WebhookResponse::new(Uuid::new_v4(), 200, "", started_at).is_success());
        assert!(WebhookResponse::new(Uuid::new_v4(), 204, "", started_at).is_success());
        assert!(!WebhookResponse::new(Uuid::new_v4(), 404, "", started_at).is_success());
        assert!(!WebhookResponse::new(Uuid::new_v4(), 500, "", started_at).is_success());
    }

    #[test]
    fn test_delivery_result_from_response() {
        let response = WebhookResponse::new(
            Uuid::new_v4(),
            500,
            "HTTP/1.1 500 Internal Server Error\r\n\r\nboom",
            Timestamp::now(),
        );

        let result = DeliveryResult::from(&response);
        assert_eq!(result.status, 500);
        assert_eq!(result.body, "boom");
    }

    #[test]
    fn test_response_duration() {
        let started_at = Timestamp::now() - SignedDuration::from_millis(250);
        let response = WebhookResponse::new(Uuid::new_v4(), 200, "", started_at);

        assert!(response.duration() >= SignedDuration::from_millis(250));
    }
}
