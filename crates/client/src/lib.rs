//! Ledger service boundary for blockvision.
//!
//! The ledger service exposes four HTTP operations:
//! - `GET /chain` returns the full chain
//! - `GET /balance/{address}` returns a wallet's balance
//! - `POST /transactions/new` queues a transfer
//! - `GET /mine` produces a block from queued transfers
//!
//! [`LedgerApi`] is the seam the sync engine is written against;
//! [`HttpLedgerClient`] is the reqwest-backed implementation.
//!
//! # Example
//!
//! ```rust,no_run
//! use blockvision_client::{ClientConfig, HttpLedgerClient, LedgerApi};
//!
//! # async fn demo() -> blockvision_client::Result<()> {
//! let client = HttpLedgerClient::new(&ClientConfig::default())?;
//! let chain = client.fetch_chain().await?;
//! println!("{} blocks", chain.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod http;

// Re-export commonly used types
pub use api::{BalanceResponse, ChainResponse, LedgerApi};
pub use config::{ClientConfig, DEFAULT_NODE_URL};
pub use error::{ClientError, Result};
pub use http::HttpLedgerClient;
