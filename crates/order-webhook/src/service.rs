//! Webhook service wrapper with observability.

use std::fmt;
use std::sync::Arc;

use crate::{Result, TRACING_TARGET, WebhookProvider, WebhookRequest, WebhookResponse};

/// Webhook service wrapper with observability.
///
/// This wrapper adds structured logging to any webhook delivery implementation.
/// The inner provider is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct WebhookService {
    inner: Arc<dyn WebhookProvider>,
}

impl fmt::Debug for WebhookService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookService").finish_non_exhaustive()
    }
}

impl WebhookService {
    /// Create a new webhook service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: WebhookProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Delivers a webhook payload to the specified endpoint.
    pub async fn deliver(&self, request: &WebhookRequest) -> Result<WebhookResponse> {
        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            order_id = request.order_id,
            url = %request.url,
            content_length = request.content_length(),
            "Delivering webhook"
        );

        let result = self.inner.deliver(request).await;

        match &result {
            Ok(response) if response.is_success() => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    order_id = request.order_id,
                    status_code = response.status_code,
                    elapsed_ms = response.duration().as_millis() as i64,
                    "Webhook delivered successfully"
                );
            }
            Ok(response) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    order_id = request.order_id,
                    status_code = response.status_code,
                    elapsed_ms = response.duration().as_millis() as i64,
                    "Webhook endpoint returned a non-success status"
                );
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    order_id = request.order_id,
                    error = %error,
                    "Webhook delivery error"
                );
            }
        }

        result
    }
}
