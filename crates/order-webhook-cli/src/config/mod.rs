//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── webhook: WebhookConfig # Default and per-store webhook URLs
//! ├── http: ReqwestConfig    # Timeouts, user agent, TLS verification
//! ├── input                  # Order event snapshot (file or stdin)
//! └── output                 # Where the saved order is written
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod webhook;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use order_webhook::reqwest::ReqwestConfig;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
pub use webhook::WebhookConfig;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "order-webhook")]
#[command(about = "Posts an order event to its store's webhook endpoint")]
#[command(version)]
pub struct Cli {
    /// Order event snapshot to dispatch; reads stdin when omitted.
    #[arg(short, long, env = "ORDER_EVENT_PATH")]
    pub input: Option<PathBuf>,

    /// Where to write the saved order; writes stdout when omitted.
    #[arg(short, long, env = "ORDER_OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Webhook endpoint configuration.
    #[clap(flatten)]
    pub webhook: WebhookConfig,

    /// HTTP client configuration.
    #[clap(flatten)]
    pub http: ReqwestConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to stderr so stdout stays reserved for the saved order.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            features = ?Self::enabled_features(),
            "Build information"
        );

        self.webhook.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            connect_timeout_secs = self.http.connect_timeout,
            http_timeout_secs = self.http.http_timeout,
            accept_invalid_certs = self.http.accept_invalid_certs,
            input = ?self.input,
            output = ?self.output,
            "HTTP configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "order-webhook",
            "--input",
            "event.json",
            "--webhook-url",
            "https://hooks.example.com/orders",
            "--store-url",
            "2=https://eu.hooks.example.com/orders",
            "--webhook-http-timeout",
            "30",
        ])
        .unwrap();

        assert_eq!(cli.input, Some(PathBuf::from("event.json")));
        assert!(cli.output.is_none());
        assert_eq!(cli.webhook.store_urls.len(), 1);
        assert_eq!(cli.http.http_timeout, 30);
        assert_eq!(cli.http.connect_timeout, 120);
        assert!(!cli.http.accept_invalid_certs);
    }
}
