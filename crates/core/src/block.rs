//! Blocks and ledger snapshots.

use crate::hash::truncate_hash;
use crate::transaction::Transaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

/// A block as reported by the ledger service.
///
/// Blocks are immutable once received. The chain linkage through
/// `previous_hash` is not verified locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block height (0 for genesis).
    pub index: u64,
    /// Hex hash of this block.
    pub hash: String,
    /// Hex hash of the parent block ("0" for genesis).
    pub previous_hash: String,
    /// Unix timestamp in seconds (the service reports fractional seconds).
    pub timestamp: f64,
    /// Proof-of-work nonce.
    #[serde(default)]
    pub nonce: u64,
    /// Transactions in block order.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Get the number of transactions in this block.
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }

    /// The block timestamp as a UTC datetime, if it is representable.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        if !self.timestamp.is_finite() {
            return None;
        }
        let whole = self.timestamp.floor();
        let nanos = ((self.timestamp - whole) * 1e9) as u32;
        DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
    }

    /// The block hash shortened for display.
    pub fn short_hash(&self) -> String {
        truncate_hash(&self.hash)
    }

    /// The parent hash shortened for display.
    pub fn short_previous_hash(&self) -> String {
        truncate_hash(&self.previous_hash)
    }
}

/// A point-in-time copy of the remote chain.
///
/// Snapshots are replaced wholesale on every refresh and never patched, so the
/// block list is shared behind an `Arc` and cloning a snapshot is cheap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerSnapshot {
    blocks: Arc<[Block]>,
}

impl LedgerSnapshot {
    /// Create a snapshot from blocks in chain order.
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks: blocks.into(),
        }
    }

    /// The blocks in chain order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The latest block, if any.
    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// All transactions, in block order then in-block order.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.blocks.iter().flat_map(|block| block.transactions.iter())
    }

    /// Check whether two snapshots share the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.blocks, &other.blocks)
    }
}

impl Deref for LedgerSnapshot {
    type Target = [Block];

    fn deref(&self) -> &Self::Target {
        &self.blocks
    }
}

impl From<Vec<Block>> for LedgerSnapshot {
    fn from(blocks: Vec<Block>) -> Self {
        Self::new(blocks)
    }
}
