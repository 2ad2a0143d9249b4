//! Reqwest client configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default connection timeout: 2 minutes.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 120;

/// Default total request timeout: 4 minutes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 240;

/// Configuration for the reqwest HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// Timeout for establishing a connection in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "webhook-connect-timeout",
            env = "WEBHOOK_CONNECT_TIMEOUT",
            default_value = "120"
        )
    )]
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout: u64,

    /// Total HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "webhook-http-timeout",
            env = "WEBHOOK_HTTP_TIMEOUT",
            default_value = "240"
        )
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "webhook-user-agent", env = "WEBHOOK_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Skip TLS certificate verification (insecure)
    #[cfg_attr(
        feature = "config",
        arg(long = "webhook-accept-invalid-certs", env = "WEBHOOK_ACCEPT_INVALID_CERTS")
    )]
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ReqwestConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout_secs(),
            http_timeout: default_timeout_secs(),
            user_agent: None,
            accept_invalid_certs: false,
        }
    }
}

impl ReqwestConfig {
    /// Returns the total timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }

    /// Returns the effective connect timeout, using default if zero.
    pub fn effective_connect_timeout(&self) -> Duration {
        if self.connect_timeout == 0 {
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.connect_timeout)
        }
    }

    /// Returns the effective total timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    /// Returns the default user agent string.
    fn default_user_agent() -> String {
        format!("order-webhook/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Set the connect timeout in seconds.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout_secs: u64) -> Self {
        self.connect_timeout = timeout_secs;
        self
    }

    /// Set the total timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Disable TLS certificate verification.
    #[must_use]
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}
