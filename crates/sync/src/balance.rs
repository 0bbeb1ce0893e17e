//! Balance of the active wallet.

use crate::fence::{Fence, Stale, Ticket};
use crate::store::Store;
use blockvision_client::{ClientError, LedgerApi};
use blockvision_core::WalletAddress;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Last known balance of the active wallet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceState {
    /// `None` before the first successful query and after a failed one.
    pub value: Option<f64>,
    /// True while a query for the active address is in flight.
    pub loading: bool,
}

/// Fetches and caches the active wallet's balance.
///
/// Queries are fenced by address: a response is committed only if the address
/// it was issued for is still the active one when it arrives, so switching
/// wallets while a query is in flight can never show the old wallet's
/// balance under the new address. `loading` clears once the newest query for
/// the active address has settled.
pub struct BalanceQuery<A> {
    api: Arc<A>,
    wallet: watch::Receiver<WalletAddress>,
    state: Store<BalanceState>,
    fence: Fence<WalletAddress>,
}

impl<A: LedgerApi> BalanceQuery<A> {
    /// Create a balance query bound to the active wallet address.
    pub fn new(api: Arc<A>, wallet: watch::Receiver<WalletAddress>) -> Self {
        Self {
            api,
            wallet,
            state: Store::default(),
            fence: Fence::new(),
        }
    }

    /// The current balance state.
    pub fn state(&self) -> BalanceState {
        self.state.get()
    }

    /// Subscribe to balance state changes.
    pub fn subscribe(&self) -> watch::Receiver<BalanceState> {
        self.state.subscribe()
    }

    fn active(&self) -> WalletAddress {
        self.wallet.borrow().clone()
    }

    /// Query the balance of the active address.
    pub async fn refresh(&self) -> Result<Option<f64>, ClientError> {
        let address = self.active();
        self.query(&address).await
    }

    /// Query the balance of `address`.
    ///
    /// An empty address resolves to no balance without a request. The
    /// fetched value is always returned to the caller, but it is written to
    /// [`BalanceState`] only if `address` is still active when it arrives.
    pub async fn query(&self, address: &WalletAddress) -> Result<Option<f64>, ClientError> {
        let ticket = self.issue(address.clone());
        self.resolve(ticket).await
    }

    /// Start a query for `address` in the background.
    ///
    /// The query is ordered against other queries when this is called, not
    /// when the task first runs.
    pub fn spawn_query(
        self: &Arc<Self>,
        address: WalletAddress,
    ) -> JoinHandle<Result<Option<f64>, ClientError>> {
        let ticket = self.issue(address);
        let this = Arc::clone(self);
        tokio::spawn(async move { this.resolve(ticket).await })
    }

    fn issue(&self, address: WalletAddress) -> Ticket<WalletAddress> {
        let ticket = self.fence.issue(address);
        let address = ticket.key();
        if !address.is_empty() && *address == self.active() {
            self.state.update(|state| state.loading = true);
        }
        ticket
    }

    async fn resolve(&self, ticket: Ticket<WalletAddress>) -> Result<Option<f64>, ClientError> {
        let address = ticket.key();

        if address.is_empty() {
            let _ = self.fence.commit(&ticket, &self.active(), |_| {
                self.state.set(BalanceState::default())
            });
            return Ok(None);
        }

        tracing::debug!(%address, seq = ticket.seq(), "querying balance");
        let result = self.api.fetch_balance(address.as_str()).await;
        let value = result.as_ref().ok().copied();

        let committed = self.fence.commit(&ticket, &self.active(), |latest| {
            self.state.set(BalanceState {
                value,
                loading: !latest,
            })
        });

        match (&result, committed) {
            (Ok(balance), Ok(())) => tracing::debug!(%address, balance, "balance updated"),
            (Err(e), Ok(())) => {
                tracing::warn!(%address, error = %e, "balance query failed, clearing balance")
            }
            (_, Err(Stale::KeyChanged)) => {
                tracing::debug!(%address, "discarding balance for inactive address")
            }
            (_, Err(Stale::Superseded)) => {
                tracing::debug!(%address, "discarding superseded balance response")
            }
        }

        result.map(Some)
    }
}
