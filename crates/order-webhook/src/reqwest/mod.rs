//! Reqwest-based HTTP client for webhook delivery.
//!
//! This module provides a reqwest-based implementation of the [`WebhookProvider`] trait.
//!
//! [`WebhookProvider`]: crate::WebhookProvider
//!
//! # Example
//!
//! ```rust,ignore
//! use order_webhook::reqwest::{ReqwestClient, ReqwestConfig};
//! use order_webhook::WebhookService;
//!
//! // Create a client with default configuration
//! let client = ReqwestClient::new(ReqwestConfig::default())?;
//!
//! // Convert to a service for dependency injection
//! let service: WebhookService = client.into_service();
//! ```

mod client;
mod config;
mod error;

pub use client::{ReqwestClient, render_raw_response};
pub use config::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS, ReqwestConfig};
pub use error::{Error, Result};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "order_webhook::reqwest";
