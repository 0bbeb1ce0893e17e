//! Client errors.

use thiserror::Error;

/// Errors returned by ledger service calls.
///
/// Everything except [`ClientError::Rejected`] means the request could not
/// complete; `Rejected` means the service answered with a non-2xx status.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("server rejected request (HTTP {status})")]
    Rejected {
        status: u16,
        /// Response body, if the service sent a non-empty one.
        message: Option<String>,
    },
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Check if the service answered with a non-2xx status.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Rejected { .. })
    }

    /// The message the service sent along with a rejection.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout(e.to_string())
        } else if e.is_connect() {
            ClientError::Connect(e.to_string())
        } else {
            ClientError::Request(e.to_string())
        }
    }
}
