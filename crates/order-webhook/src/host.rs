//! Capabilities the host platform injects into the dispatcher.

use crate::Result;
use crate::model::{Customer, CustomerId, Order, StoreId, VisitorFingerprint};

/// Configuration path of the order webhook URL.
pub const ORDER_WEBHOOK_URL_PATH: &str = "webhook/order/url";

/// Store-scoped configuration lookup.
pub trait ConfigProvider: Send + Sync {
    /// Returns the value stored at `path` for the given store.
    fn store_config(&self, path: &str, store_id: StoreId) -> Option<String>;

    /// Returns the configured order webhook URL, ignoring blank values.
    fn order_webhook_url(&self, store_id: StoreId) -> Option<String> {
        self.store_config(ORDER_WEBHOOK_URL_PATH, store_id)
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty())
    }
}

/// Access to the current visitor session.
pub trait SessionProvider: Send + Sync {
    /// Returns the validator data of the current session.
    fn visitor_fingerprint(&self) -> VisitorFingerprint;
}

/// Read access to customer accounts.
#[async_trait::async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Loads a customer by id, returning `None` when no such account exists.
    async fn find_customer(&self, customer_id: CustomerId) -> Result<Option<Customer>>;
}

/// Persistence of orders.
#[async_trait::async_trait]
pub trait OrderRepository: Send + Sync {
    /// Saves the order, including its status history.
    async fn save_order(&self, order: &Order) -> Result<()>;
}
