//! Derived wallet history view.

use crate::store::Store;
use blockvision_core::{wallet_history, HistoryEntry, LedgerSnapshot, WalletAddress};
use std::sync::Arc;
use tokio::sync::watch;

/// Wallet history together with the inputs it was computed from.
#[derive(Debug, Clone, Default)]
pub struct WalletHistory {
    pub address: WalletAddress,
    pub snapshot: LedgerSnapshot,
    pub entries: Arc<[HistoryEntry]>,
}

impl WalletHistory {
    /// Compute the history of `address` over `snapshot`.
    pub fn compute(snapshot: &LedgerSnapshot, address: &WalletAddress) -> Self {
        Self {
            address: address.clone(),
            snapshot: snapshot.clone(),
            entries: wallet_history(snapshot.blocks(), address.as_str()).into(),
        }
    }

    /// Check whether this history was computed from exactly these inputs.
    pub fn is_for(&self, snapshot: &LedgerSnapshot, address: &WalletAddress) -> bool {
        self.address == *address && self.snapshot.ptr_eq(snapshot)
    }
}

/// Recomputes the wallet history whenever the snapshot or the wallet changes.
///
/// The published value is only written by [`HistoryView::run`]. Readers
/// going through [`HistoryView::current`] never get a history computed for a
/// previous wallet or snapshot: if the published value lags behind its
/// inputs, it is recomputed on the spot.
pub struct HistoryView {
    snapshot: watch::Receiver<LedgerSnapshot>,
    wallet: watch::Receiver<WalletAddress>,
    history: Store<WalletHistory>,
}

impl HistoryView {
    /// Create a view over the given inputs and compute it once.
    pub fn new(
        snapshot: watch::Receiver<LedgerSnapshot>,
        wallet: watch::Receiver<WalletAddress>,
    ) -> Self {
        let initial = WalletHistory::compute(&snapshot.borrow(), &wallet.borrow());
        Self {
            snapshot,
            wallet,
            history: Store::new(initial),
        }
    }

    fn inputs(&self) -> (LedgerSnapshot, WalletAddress) {
        (self.snapshot.borrow().clone(), self.wallet.borrow().clone())
    }

    /// The history for the current snapshot and wallet.
    pub fn current(&self) -> WalletHistory {
        let (snapshot, address) = self.inputs();
        let published = self.history.get();
        if published.is_for(&snapshot, &address) {
            published
        } else {
            WalletHistory::compute(&snapshot, &address)
        }
    }

    /// Subscribe to recomputed histories.
    pub fn subscribe(&self) -> watch::Receiver<WalletHistory> {
        self.history.subscribe()
    }

    fn recompute(&self) {
        let (snapshot, address) = self.inputs();
        let history = WalletHistory::compute(&snapshot, &address);
        tracing::debug!(%address, entries = history.entries.len(), "history recomputed");
        self.history.set(history);
    }

    /// Recompute on every input change until either input is closed.
    pub async fn run(self: Arc<Self>) {
        let mut snapshot = self.snapshot.clone();
        let mut wallet = self.wallet.clone();
        loop {
            tokio::select! {
                changed = snapshot.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = wallet.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
            self.recompute();
        }
    }
}
