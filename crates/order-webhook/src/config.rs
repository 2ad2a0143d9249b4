//! In-memory store-scoped configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::host::{ConfigProvider, ORDER_WEBHOOK_URL_PATH};
use crate::model::StoreId;

/// Store-scoped configuration values with a default-scope fallback.
///
/// A store without its own value for a path inherits the default scope value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    defaults: HashMap<String, String>,
    #[serde(default)]
    stores: HashMap<StoreId, HashMap<String, String>>,
}

impl StoreConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a default-scope value.
    pub fn set_default(&mut self, path: impl Into<String>, value: impl Into<String>) {
        self.defaults.insert(path.into(), value.into());
    }

    /// Sets a value for a single store.
    pub fn set_store(
        &mut self,
        store_id: StoreId,
        path: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.stores
            .entry(store_id)
            .or_default()
            .insert(path.into(), value.into());
    }

    /// Sets the default-scope order webhook URL.
    #[must_use]
    pub fn with_default_url(mut self, url: impl Into<String>) -> Self {
        self.set_default(ORDER_WEBHOOK_URL_PATH, url);
        self
    }

    /// Sets the order webhook URL of a single store.
    #[must_use]
    pub fn with_store_url(mut self, store_id: StoreId, url: impl Into<String>) -> Self {
        self.set_store(store_id, ORDER_WEBHOOK_URL_PATH, url);
        self
    }
}

impl ConfigProvider for StoreConfig {
    fn store_config(&self, path: &str, store_id: StoreId) -> Option<String> {
        self.stores
            .get(&store_id)
            .and_then(|values| values.get(path))
            .or_else(|| self.defaults.get(path))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_value_wins() {
        let config = StoreConfig::new()
            .with_default_url("https://default.example.com")
            .with_store_url(2, "https://store2.example.com");

        assert_eq!(
            config.order_webhook_url(2).as_deref(),
            Some("https://store2.example.com")
        );
    }

    #[test]
    fn test_falls_back_to_default_scope() {
        let config = StoreConfig::new().with_default_url("https://default.example.com");

        assert_eq!(
            config.order_webhook_url(7).as_deref(),
            Some("https://default.example.com")
        );
    }

    #[test]
    fn test_missing_url() {
        let config = StoreConfig::new().with_store_url(1, "https://store1.example.com");
        assert!(config.order_webhook_url(2).is_none());
    }

    #[test]
    fn test_blank_url_is_missing() {
        let config = StoreConfig::new()
            .with_default_url("https://default.example.com")
            .with_store_url(1, "   ");

        assert!(config.order_webhook_url(1).is_none());
    }

    #[test]
    fn test_other_paths() {
        let mut config = StoreConfig::new();
        config.set_store(1, "webhook/order/secret", "s3cret");

        assert_eq!(
            config.store_config("webhook/order/secret", 1).as_deref(),
            Some("s3cret")
        );
        assert!(config.order_webhook_url(1).is_none());
    }
}
