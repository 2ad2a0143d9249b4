//! Host collaborators backed by an order event snapshot.
//!
//! The snapshot stands in for the host platform: it carries the order, the
//! customer record (if any) and the visitor's session fingerprint.

use std::io::Write;
use std::path::PathBuf;

use order_webhook::model::{Customer, CustomerId, Order, OrderEvent, VisitorFingerprint};
use order_webhook::{CustomerRepository, OrderRepository, Result, SessionProvider};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_HOST;

/// Everything the host would hand to the dispatcher for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSnapshot {
    pub order: Order,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub visitor: VisitorFingerprint,
}

impl EventSnapshot {
    /// Parses a snapshot from JSON.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Splits the snapshot into the event and its collaborators.
    pub fn into_parts(self) -> (OrderEvent, SnapshotCustomers, SnapshotSession) {
        let customers = SnapshotCustomers {
            customer: self.customer,
        };
        let session = SnapshotSession {
            visitor: self.visitor,
        };

        (OrderEvent::new(self.order), customers, session)
    }
}

/// Serves the single customer record of the snapshot.
///
/// The record is returned for whatever id the order carries.
#[derive(Debug, Clone)]
pub struct SnapshotCustomers {
    customer: Option<Customer>,
}

#[async_trait::async_trait]
impl CustomerRepository for SnapshotCustomers {
    async fn find_customer(&self, _customer_id: CustomerId) -> Result<Option<Customer>> {
        Ok(self.customer.clone())
    }
}

/// Serves the visitor fingerprint of the snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotSession {
    visitor: VisitorFingerprint,
}

impl SessionProvider for SnapshotSession {
    fn visitor_fingerprint(&self) -> VisitorFingerprint {
        self.visitor.clone()
    }
}

/// Persists saved orders as pretty-printed JSON to a file or stdout.
#[derive(Debug, Clone)]
pub struct JsonOrderWriter {
    output: Option<PathBuf>,
}

impl JsonOrderWriter {
    /// Creates a writer; `None` writes to stdout.
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }
}

#[async_trait::async_trait]
impl OrderRepository for JsonOrderWriter {
    async fn save_order(&self, order: &Order) -> Result<()> {
        let mut json = serde_json::to_vec_pretty(order)?;
        json.push(b'\n');

        match &self.output {
            Some(path) => tokio::fs::write(path, &json).await?,
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&json)?;
                stdout.flush()?;
            }
        }

        tracing::debug!(
            target: TRACING_TARGET_HOST,
            order_id = order.entity_id,
            output = ?self.output,
            "Order saved"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_snapshot_parts() {
        let snapshot = EventSnapshot::from_slice(
            json!({
                "order": { "entity_id": 1001, "store_id": 1, "status": "pending", "customer_id": 42 },
                "customer": { "entity_id": 42, "email": "jane@example.com" },
                "visitor": { "remote_addr": "10.0.0.1" }
            })
            .to_string()
            .as_bytes(),
        )
        .unwrap();

        let (event, customers, session) = snapshot.into_parts();

        assert_eq!(event.order.entity_id, 1001);
        let customer = customers.find_customer(42).await.unwrap().unwrap();
        assert_eq!(customer.email.as_deref(), Some("jane@example.com"));
        assert_eq!(
            session.visitor_fingerprint().remote_addr.as_deref(),
            Some("10.0.0.1")
        );
    }

    #[test]
    fn test_snapshot_defaults() {
        let snapshot =
            EventSnapshot::from_slice(br#"{ "order": { "entity_id": 1, "store_id": 1 } }"#)
                .unwrap();

        assert!(snapshot.customer.is_none());
        assert!(snapshot.visitor.is_empty());
    }

    #[test]
    fn test_invalid_snapshot() {
        let error = EventSnapshot::from_slice(b"{").unwrap_err();
        assert_eq!(error.kind(), order_webhook::ErrorKind::Serialization);
    }

    #[tokio::test]
    async fn test_writer_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("order.json");
        let writer = JsonOrderWriter::new(Some(path.clone()));

        let mut order = Order::new(7, 1).with_status("pending");
        order.add_status_history_comment("GoMedia Web Hook: Sent, Status: 200 Response: OK", false);
        writer.save_order(&order).await.unwrap();

        let saved: Order = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(saved.entity_id, 7);
        assert_eq!(saved.status_history.len(), 1);
    }
}
