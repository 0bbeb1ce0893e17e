//! Wallet-scoped transaction history.
//!
//! The history is derived from a ledger snapshot and a wallet address and is
//! never stored on its own: recomputing it with the same inputs always yields
//! the same entries.

use crate::block::Block;
use crate::transaction::Transaction;
use std::fmt;

/// Whether the wallet paid or was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Sent => f.write_str("Sent"),
            Direction::Received => f.write_str("Received"),
        }
    }
}

/// Positional identity of a transaction inside a snapshot.
///
/// The ledger service gives transactions no id, so list reconciliation keys on
/// where the transaction sits: block position, then position inside the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey {
    pub block: usize,
    pub position: usize,
}

/// One transaction that touches the wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub key: EntryKey,
    /// Height of the containing block as reported by the service.
    pub block_index: u64,
    pub direction: Direction,
    pub transaction: Transaction,
}

impl HistoryEntry {
    /// The other side of the transfer.
    pub fn counterparty(&self) -> &str {
        match self.direction {
            Direction::Sent => &self.transaction.receiver,
            Direction::Received => &self.transaction.sender,
        }
    }

    /// The transferred amount.
    pub fn amount(&self) -> f64 {
        self.transaction.amount
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preposition = match self.direction {
            Direction::Sent => "to",
            Direction::Received => "from",
        };
        write!(
            f,
            "{} {} coins {} {}",
            self.direction,
            self.amount(),
            preposition,
            self.counterparty()
        )
    }
}

/// Collect the transactions in `blocks` that involve `address`.
///
/// Order follows the chain: block order, then in-block order. A transfer from
/// the wallet to itself is classified as sent. An empty address matches
/// nothing.
pub fn wallet_history(blocks: &[Block], address: &str) -> Vec<HistoryEntry> {
    if address.is_empty() {
        return Vec::new();
    }

    blocks
        .iter()
        .enumerate()
        .flat_map(move |(block_pos, block)| {
            block
                .transactions
                .iter()
                .enumerate()
                .filter(move |(_, tx)| tx.involves(address))
                .map(move |(position, tx)| HistoryEntry {
                    key: EntryKey {
                        block: block_pos,
                        position,
                    },
                    block_index: block.index,
                    direction: if tx.sender == address {
                        Direction::Sent
                    } else {
                        Direction::Received
                    },
                    transaction: tx.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(index: u64, transactions: Vec<Transaction>) -> Block {
        Block {
            index,
            hash: format!("hash{}", index),
            previous_hash: "0".into(),
            timestamp: 0.0,
            nonce: 0,
            transactions,
        }
    }

    #[test]
    fn test_genesis_only_is_empty() {
        let chain = vec![block(0, vec![])];
        assert!(wallet_history(&chain, "W1").is_empty());
    }

    #[test]
    fn test_single_sent_entry() {
        let chain = vec![block(0, vec![Transaction::new("W1", "W2", 5.0)])];
        let history = wallet_history(&chain, "W1");

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].direction, Direction::Sent);
        assert_eq!(history[0].counterparty(), "W2");
        assert_eq!(history[0].to_string(), "Sent 5 coins to W2");
    }

    #[test]
    fn test_received_entry() {
        let chain = vec![block(0, vec![Transaction::new("W2", "W1", 2.5)])];
        let history = wallet_history(&chain, "W1");

        assert_eq!(history[0].direction, Direction::Received);
        assert_eq!(history[0].to_string(), "Received 2.5 coins from W2");
    }

    #[test]
    fn test_order_and_filtering() {
        let chain = vec![
            block(0, vec![]),
            block(
                1,
                vec![
                    Transaction::new("W1", "W2", 1.0),
                    Transaction::new("X", "Y", 9.0),
                    Transaction::new("W3", "W1", 2.0),
                ],
            ),
            block(2, vec![Transaction::new("W1", "W4", 3.0)]),
        ];

        let history = wallet_history(&chain, "W1");
        let amounts: Vec<f64> = history.iter().map(|e| e.amount()).collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0]);

        let keys: Vec<(usize, usize)> = history
            .iter()
            .map(|e| (e.key.block, e.key.position))
            .collect();
        assert_eq!(keys, vec![(1, 0), (1, 2), (2, 0)]);
        assert_eq!(history[2].block_index, 2);

        assert!(history.iter().all(|e| e.transaction.involves("W1")));
    }

    #[test]
    fn test_duplicates_keep_distinct_keys() {
        let tx = Transaction::new("W1", "W2", 1.0);
        let chain = vec![block(0, vec![tx.clone(), tx])];
        let history = wallet_history(&chain, "W1");

        assert_eq!(history.len(), 2);
        assert_ne!(history[0].key, history[1].key);
    }

    #[test]
    fn test_self_transfer_is_sent() {
        let chain = vec![block(0, vec![Transaction::new("W1", "W1", 1.0)])];
        let history = wallet_history(&chain, "W1");
        assert_eq!(history[0].direction, Direction::Sent);
    }

    #[test]
    fn test_empty_address_matches_nothing() {
        let chain = vec![block(0, vec![Transaction::new("", "W2", 1.0)])];
        assert!(wallet_history(&chain, "").is_empty());
    }

    #[test]
    fn test_deterministic() {
        let chain = vec![block(
            0,
            vec![
                Transaction::new("W1", "W2", 1.0),
                Transaction::new("W2", "W1", 2.0),
            ],
        )];
        assert_eq!(wallet_history(&chain, "W1"), wallet_history(&chain, "W1"));
    }
}
