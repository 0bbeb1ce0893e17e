//! Client-side state for the blockvision dashboard.
//!
//! The ledger service is the source of truth. This crate keeps a local,
//! observable copy of what the user is looking at and derives views from it:
//!
//! - [`LedgerStore`] holds the last fetched chain snapshot
//! - [`WalletIdentity`] holds the active wallet address
//! - [`BalanceQuery`] follows the active wallet, discarding stale responses
//! - [`HistoryView`] derives the wallet's transfer history from the snapshot
//! - [`TransactionSubmission`] and [`MiningTrigger`] mutate the ledger and
//!   refresh afterwards through a [`RefreshCascade`]
//!
//! [`Session`] wires them together. Every piece of state lives in a
//! [`Store`], a single-writer value that readers can subscribe to.
//!
//! ```no_run
//! use blockvision_client::{ClientConfig, HttpLedgerClient};
//! use blockvision_sync::Session;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpLedgerClient::new(&ClientConfig::default())?;
//! let session = Session::new(Arc::new(client));
//! session.start().await;
//!
//! for entry in session.wallet_history().entries.iter() {
//!     println!("{entry}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod balance;
pub mod busy;
pub mod cascade;
pub mod clipboard;
pub mod fence;
pub mod history;
pub mod ledger;
pub mod mining;
pub mod session;
pub mod store;
pub mod submission;
pub mod wallet;

pub use balance::{BalanceQuery, BalanceState};
pub use busy::{BusyFlag, BusyGuard};
pub use cascade::{CascadeReport, RefreshCascade};
pub use clipboard::{ClipboardError, ClipboardHandle, ClipboardProvider, CopyFeedback};
pub use fence::{Fence, Stale, Ticket};
pub use history::{HistoryView, WalletHistory};
pub use ledger::LedgerStore;
pub use mining::{MiningError, MiningReceipt, MiningTrigger};
pub use session::Session;
pub use store::Store;
pub use submission::{
    SubmissionError, SubmissionPhase, SubmissionReceipt, TransactionSubmission,
};
pub use wallet::WalletIdentity;
