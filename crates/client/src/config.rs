//! Client configuration.

use std::time::Duration;

/// Default ledger service address (the service's development port).
pub const DEFAULT_NODE_URL: &str = "http://127.0.0.1:5000";

/// Configuration for [`crate::HttpLedgerClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the ledger service.
    pub base_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NODE_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}
