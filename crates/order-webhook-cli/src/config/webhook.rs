//! Webhook endpoint configuration.
//!
//! The default URL applies to every store; `--store-url` overrides it for a
//! single store. Only typed fields are posted unless `--export-attribute`
//! names a free-form attribute to include.
//!
//! # Example
//!
//! ```bash
//! order-webhook --webhook-url https://hooks.example.com/orders \
//!     --store-url 2=https://eu.hooks.example.com/orders \
//!     --export-attribute order.gift_message
//! ```

use std::fmt;
use std::str::FromStr;

use clap::Args;
use order_webhook::StoreConfig;
use order_webhook::model::StoreId;
use order_webhook::payload::{ExportEntity, ExportPolicy};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// A webhook URL bound to one store, written as `<store_id>=<url>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreUrl {
    pub store_id: StoreId,
    pub url: String,
}

impl FromStr for StoreUrl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (store_id, url) = s
            .split_once('=')
            .ok_or_else(|| format!("expected <store_id>=<url>, got '{s}'"))?;

        let store_id = store_id
            .trim()
            .parse()
            .map_err(|err| format!("invalid store id '{store_id}': {err}"))?;

        Ok(Self {
            store_id,
            url: url.trim().to_owned(),
        })
    }
}

impl fmt::Display for StoreUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.store_id, self.url)
    }
}

/// A free-form attribute to export, written as `<entity>.<key>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportAttribute {
    pub entity: ExportEntity,
    pub key: String,
}

impl FromStr for ExportAttribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (entity, key) = s
            .split_once('.')
            .ok_or_else(|| format!("expected <entity>.<key>, got '{s}'"))?;

        let entity = entity
            .trim()
            .parse()
            .map_err(|_| format!("unknown entity '{entity}'"))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(format!("missing attribute key in '{s}'"));
        }

        Ok(Self {
            entity,
            key: key.to_owned(),
        })
    }
}

impl fmt::Display for ExportAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity, self.key)
    }
}

/// Order webhook URL configuration.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Default-scope order webhook URL
    #[arg(long = "webhook-url", env = "ORDER_WEBHOOK_URL")]
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Store-scoped order webhook URL, as <store_id>=<url>
    #[arg(long = "store-url", env = "ORDER_WEBHOOK_STORE_URLS", value_delimiter = ',')]
    #[serde(default)]
    pub store_urls: Vec<StoreUrl>,

    /// Free-form attribute to post, as <entity>.<key>
    #[arg(
        long = "export-attribute",
        env = "ORDER_WEBHOOK_EXPORT_ATTRIBUTES",
        value_delimiter = ','
    )]
    #[serde(default)]
    pub export_attributes: Vec<ExportAttribute>,
}

impl WebhookConfig {
    /// Builds the store configuration read by the dispatcher.
    pub fn store_config(&self) -> StoreConfig {
        let mut config = StoreConfig::new();
        if let Some(url) = &self.webhook_url {
            config = config.with_default_url(url.clone());
        }

        self.store_urls
            .iter()
            .fold(config, |config, store| {
                config.with_store_url(store.store_id, store.url.clone())
            })
    }

    /// Builds the attribute export policy; empty unless attributes are listed.
    pub fn export_policy(&self) -> ExportPolicy {
        self.export_attributes
            .iter()
            .fold(ExportPolicy::new(), |policy, attribute| {
                policy.with_attribute(attribute.entity, attribute.key.clone())
            })
    }

    /// Logs webhook configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            webhook_url = ?self.webhook_url,
            store_urls = self.store_urls.len(),
            export_attributes = self.export_attributes.len(),
            "Webhook configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use order_webhook::ConfigProvider;

    use super::*;

    #[test]
    fn test_parse_store_url() {
        let parsed: StoreUrl = "2=https://eu.hooks.example.com/orders".parse().unwrap();
        assert_eq!(parsed.store_id, 2);
        assert_eq!(parsed.url, "https://eu.hooks.example.com/orders");
        assert_eq!(parsed.to_string(), "2=https://eu.hooks.example.com/orders");
    }

    #[test]
    fn test_parse_store_url_keeps_query_equals() {
        let parsed: StoreUrl = "1=https://hooks.example.com/?token=abc".parse().unwrap();
        assert_eq!(parsed.url, "https://hooks.example.com/?token=abc");
    }

    #[test]
    fn test_parse_store_url_rejects_garbage() {
        assert!("https://hooks.example.com".parse::<StoreUrl>().is_err());
        assert!("eu=https://hooks.example.com".parse::<StoreUrl>().is_err());
    }

    #[test]
    fn test_store_config() {
        let config = WebhookConfig {
            webhook_url: Some("https://hooks.example.com/orders".into()),
            store_urls: vec!["2=https://eu.hooks.example.com/orders".parse().unwrap()],
            export_attributes: Vec::new(),
        };

        let store_config = config.store_config();
        assert_eq!(
            store_config.order_webhook_url(1).as_deref(),
            Some("https://hooks.example.com/orders")
        );
        assert_eq!(
            store_config.order_webhook_url(2).as_deref(),
            Some("https://eu.hooks.example.com/orders")
        );
    }

    #[test]
    fn test_empty_config_has_no_url() {
        let store_config = WebhookConfig::default().store_config();
        assert!(store_config.order_webhook_url(1).is_none());
    }

    #[test]
    fn test_parse_export_attribute() {
        let parsed: ExportAttribute = "line_item.gift_wrap".parse().unwrap();
        assert_eq!(parsed.entity, ExportEntity::LineItem);
        assert_eq!(parsed.key, "gift_wrap");
        assert_eq!(parsed.to_string(), "line_item.gift_wrap");

        assert!("gift_wrap".parse::<ExportAttribute>().is_err());
        assert!("invoice.number".parse::<ExportAttribute>().is_err());
        assert!("order.".parse::<ExportAttribute>().is_err());
    }

    #[test]
    fn test_export_policy_defaults_to_typed_fields_only() {
        assert!(WebhookConfig::default().export_policy().is_empty());

        let config = WebhookConfig {
            export_attributes: vec!["order.gift_message".parse().unwrap()],
            ..Default::default()
        };
        let policy = config.export_policy();

        assert!(policy.allows(ExportEntity::Order, "gift_message"));
        assert!(!policy.allows(ExportEntity::Customer, "gift_message"));
    }
}
