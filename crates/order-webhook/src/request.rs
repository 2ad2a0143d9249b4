//! Webhook delivery request types.

use url::Url;
use uuid::Uuid;

use crate::model::OrderId;
use crate::payload::OrderPayload;

/// A single JSON POST to a webhook endpoint.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    /// Unique identifier for this request.
    pub request_id: Uuid,
    /// The webhook endpoint URL.
    pub url: Url,
    /// The order this request delivers.
    pub order_id: OrderId,
    /// Serialized JSON body.
    pub body: Vec<u8>,
}

impl WebhookRequest {
    /// Creates a new request with an already serialized JSON body.
    pub fn new(url: Url, order_id: OrderId, body: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            url,
            order_id,
            body,
        }
    }

    /// Serializes the payload and wraps it into a request.
    pub fn from_payload(url: Url, payload: &OrderPayload) -> crate::Result<Self> {
        Ok(Self::new(url, payload.order.entity_id, payload.to_json()?))
    }

    /// Returns the exact byte length of the body.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Order, VisitorFingerprint};

    #[test]
    fn test_request_from_payload() {
        let url = Url::parse("https://hooks.example.com/orders").unwrap();
        let order = Order::new(1001, 1).with_status("pending");
        let payload = OrderPayload::new(&order, None, VisitorFingerprint::default());

        let request = WebhookRequest::from_payload(url.clone(), &payload).unwrap();

        assert_eq!(request.url, url);
        assert_eq!(request.order_id, 1001);
        assert_eq!(request.content_length(), payload.to_json().unwrap().len());
    }

    #[test]
    fn test_content_length_counts_bytes() {
        let url = Url::parse("https://hooks.example.com/orders").unwrap();
        let request = WebhookRequest::new(url, 1, "{\"name\":\"Zoë\"}".as_bytes().to_vec());

        assert_eq!(request.content_length(), 15);
    }
}
