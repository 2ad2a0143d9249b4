#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod service;

pub mod config;
pub mod dispatcher;
pub mod host;
pub mod model;
pub mod payload;
pub mod request;
pub mod response;

#[cfg(any(test, feature = "mock"))]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub mod mock;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use config::StoreConfig;
pub use dispatcher::{DispatchOutcome, OrderDispatcher, SkipReason};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use host::{ConfigProvider, CustomerRepository, OrderRepository, SessionProvider};
pub use payload::{ExportEntity, ExportPolicy, OrderPayload};
pub use request::WebhookRequest;
pub use response::{DeliveryResult, WebhookResponse};
pub use service::WebhookService;

/// Tracing target for webhook delivery operations.
pub const TRACING_TARGET: &str = "order_webhook::delivery";

/// Core trait for webhook delivery.
///
/// Implement this trait to plug in a different HTTP transport.
#[async_trait::async_trait]
pub trait WebhookProvider: Send + Sync {
    /// Posts the request body to the request URL.
    ///
    /// Returns an error only when no HTTP response was received at all.
    async fn deliver(&self, request: &WebhookRequest) -> Result<WebhookResponse>;
}
