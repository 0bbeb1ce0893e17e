//! The ledger service contract.

use crate::error::Result;
use blockvision_core::{Block, Transaction};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Body of `GET /chain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    #[serde(default)]
    pub length: Option<usize>,
}

/// Body of `GET /balance/{address}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: f64,
    #[serde(default)]
    pub wallet: Option<String>,
}

/// Operations offered by the ledger service.
///
/// Each call is a single attempt: no retry, no backoff. Callers decide
/// whether and when to try again.
pub trait LedgerApi: Send + Sync + 'static {
    /// Fetch the full chain in block order.
    fn fetch_chain(&self) -> impl Future<Output = Result<Vec<Block>>> + Send;

    /// Fetch the balance of `address`.
    fn fetch_balance(&self, address: &str) -> impl Future<Output = Result<f64>> + Send;

    /// Queue a transfer. Returns the service's confirmation text.
    fn submit_transaction(&self, tx: &Transaction) -> impl Future<Output = Result<String>> + Send;

    /// Ask the service to mine a block. Returns the service's confirmation text.
    fn mine(&self) -> impl Future<Output = Result<String>> + Send;
}
