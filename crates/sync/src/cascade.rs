//! Post-action refresh cascade.

use crate::balance::BalanceQuery;
use crate::ledger::LedgerStore;
use blockvision_client::{ClientError, LedgerApi};
use std::sync::Arc;

/// Outcome of one cascade run.
#[derive(Debug, Clone)]
pub struct CascadeReport {
    pub chain: Result<(), ClientError>,
    pub balance: Result<(), ClientError>,
}

impl CascadeReport {
    /// Check whether both refreshes succeeded.
    pub fn is_complete(&self) -> bool {
        self.chain.is_ok() && self.balance.is_ok()
    }
}

/// Re-fetches server-confirmed state after a mutating action.
///
/// The chain is refreshed first, then the active wallet's balance. Both are
/// always attempted; a failure of either leaves the other's result in place.
pub struct RefreshCascade<A> {
    ledger: Arc<LedgerStore<A>>,
    balance: Arc<BalanceQuery<A>>,
}

impl<A> Clone for RefreshCascade<A> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            balance: Arc::clone(&self.balance),
        }
    }
}

impl<A: LedgerApi> RefreshCascade<A> {
    pub fn new(ledger: Arc<LedgerStore<A>>, balance: Arc<BalanceQuery<A>>) -> Self {
        Self { ledger, balance }
    }

    /// Refresh the chain, then the balance.
    pub async fn run(&self) -> CascadeReport {
        let chain = self.ledger.refresh().await.map(|_| ());
        let balance = self.balance.refresh().await.map(|_| ());
        CascadeReport { chain, balance }
    }
}
