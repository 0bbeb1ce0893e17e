//! Wallet addresses.
//!
//! An address is an opaque identifier the client generates once per session.
//! It is not derived from a key and carries no checksum.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// An opaque wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Generate a fresh 128-bit random address (UUID v4 text form).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Build an address from user input, trimming surrounding whitespace.
    ///
    /// No format check is applied: any string, including an empty one, is
    /// accepted so the user can inspect arbitrary wallets.
    pub fn from_input(input: &str) -> Self {
        Self(input.trim().to_string())
    }

    /// Get the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the address is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WalletAddress {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for WalletAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}
