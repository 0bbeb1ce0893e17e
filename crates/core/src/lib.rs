//! Core data model for blockvision.
//!
//! This crate provides the types shared by the client and the sync engine:
//! - Blocks and ledger snapshots as served by the ledger service
//! - Transactions and the transfer form with its validation rules
//! - Wallet addresses (opaque, session-generated identifiers)
//! - The wallet-scoped transaction history view
//! - Hash display helpers

pub mod block;
pub mod hash;
pub mod history;
pub mod transaction;
pub mod wallet;

// Re-export commonly used types at the crate root
pub use block::{Block, LedgerSnapshot};
pub use hash::truncate_hash;
pub use history::{wallet_history, Direction, EntryKey, HistoryEntry};
pub use transaction::{Transaction, TransferForm, ValidationError};
pub use wallet::WalletAddress;
