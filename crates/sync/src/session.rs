//! A dashboard session wiring the stores together.

use crate::balance::{BalanceQuery, BalanceState};
use crate::cascade::{CascadeReport, RefreshCascade};
use crate::clipboard::{ClipboardError, ClipboardProvider, CopyFeedback};
use crate::history::{HistoryView, WalletHistory};
use crate::ledger::LedgerStore;
use crate::mining::{MiningError, MiningReceipt, MiningTrigger};
use crate::submission::{SubmissionError, SubmissionReceipt, TransactionSubmission};
use crate::wallet::WalletIdentity;
use blockvision_client::LedgerApi;
use blockvision_core::{LedgerSnapshot, WalletAddress};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// One user's view of the ledger.
///
/// Owns the ledger snapshot, the wallet identity and everything derived from
/// them. Two background tasks keep derived state in step with its inputs:
/// the wallet history is recomputed when the chain or the wallet changes, and
/// a balance query is started on every wallet change. Both are stopped when
/// the session is dropped.
///
/// Must be created within a tokio runtime.
pub struct Session<A: LedgerApi> {
    wallet: Arc<WalletIdentity>,
    ledger: Arc<LedgerStore<A>>,
    balance: Arc<BalanceQuery<A>>,
    history: Arc<HistoryView>,
    cascade: RefreshCascade<A>,
    submission: TransactionSubmission<A>,
    mining: MiningTrigger<A>,
    copy: CopyFeedback,
    reactors: Vec<JoinHandle<()>>,
}

impl<A: LedgerApi> Session<A> {
    /// Start a session with a freshly generated wallet address.
    pub fn new(api: Arc<A>) -> Self {
        Self::with_identity(api, WalletIdentity::generate())
    }

    /// Start a session for a known wallet address.
    pub fn with_wallet(api: Arc<A>, address: WalletAddress) -> Self {
        Self::with_identity(api, WalletIdentity::with_address(address))
    }

    /// Start a session with no wallet. Balance queries resolve to nothing
    /// without a request, for one-shot commands that never show a balance.
    pub fn without_wallet(api: Arc<A>) -> Self {
        Self::with_identity(api, WalletIdentity::with_address(WalletAddress::from("")))
    }

    fn with_identity(api: Arc<A>, wallet: WalletIdentity) -> Self {
        let wallet = Arc::new(wallet);
        let balance = Arc::new(BalanceQuery::new(api.clone(), wallet.subscribe()));
        let ledger = Arc::new(LedgerStore::new(api.clone()));
        let history = Arc::new(HistoryView::new(ledger.subscribe(), wallet.subscribe()));
        let cascade = RefreshCascade::new(ledger.clone(), balance.clone());
        let submission = TransactionSubmission::new(api.clone(), wallet.clone(), cascade.clone());
        let mining = MiningTrigger::new(api, cascade.clone());

        let reactors = vec![
            tokio::spawn(history.clone().run()),
            tokio::spawn(balance_follows_wallet(wallet.subscribe(), balance.clone())),
        ];

        tracing::info!(wallet = %wallet.active(), "session started");

        Self {
            wallet,
            ledger,
            balance,
            history,
            cascade,
            submission,
            mining,
            copy: CopyFeedback::new(),
            reactors,
        }
    }

    /// Initial load: fetch the chain and the balance concurrently.
    pub async fn start(&self) -> CascadeReport {
        let (chain, balance) = tokio::join!(self.ledger.refresh(), self.balance.refresh());
        CascadeReport {
            chain: chain.map(|_| ()),
            balance: balance.map(|_| ()),
        }
    }

    /// Re-fetch the chain, then the balance.
    pub async fn refresh(&self) -> CascadeReport {
        self.cascade.run().await
    }

    pub fn wallet(&self) -> &WalletIdentity {
        &self.wallet
    }

    pub fn ledger(&self) -> &LedgerStore<A> {
        &self.ledger
    }

    pub fn balance(&self) -> &BalanceQuery<A> {
        &self.balance
    }

    pub fn history(&self) -> &HistoryView {
        &self.history
    }

    pub fn submission(&self) -> &TransactionSubmission<A> {
        &self.submission
    }

    pub fn mining(&self) -> &MiningTrigger<A> {
        &self.mining
    }

    pub fn copy_feedback(&self) -> &CopyFeedback {
        &self.copy
    }

    /// The current chain snapshot.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }

    /// The active wallet's balance.
    pub fn balance_state(&self) -> BalanceState {
        self.balance.state()
    }

    /// The active wallet's history over the current snapshot.
    pub fn wallet_history(&self) -> WalletHistory {
        self.history.current()
    }

    /// Switch the active wallet. The balance and history follow.
    pub fn set_wallet(&self, input: &str) -> WalletAddress {
        self.wallet.set_override(input)
    }

    /// Switch back to the session's own wallet.
    pub fn reset_wallet(&self) -> WalletAddress {
        self.wallet.reset()
    }

    pub async fn submit(&self) -> Result<SubmissionReceipt, SubmissionError> {
        self.submission.submit().await
    }

    pub async fn mine(&self) -> Result<MiningReceipt, MiningError> {
        self.mining.mine().await
    }

    /// Copy the active wallet address to the clipboard.
    pub fn copy_address<C: ClipboardProvider>(&self, clipboard: &C) -> Result<(), ClipboardError> {
        let address = self.wallet.active();
        self.copy.copy(clipboard, address.as_str())
    }
}

impl<A: LedgerApi> Drop for Session<A> {
    fn drop(&mut self) {
        for reactor in &self.reactors {
            reactor.abort();
        }
    }
}

/// Start a balance query for every new active address.
///
/// Queries run detached so a slow one never delays the next. Each is ordered
/// before it is spawned, so query order follows wallet changes; stale results
/// are dropped by the balance fence.
async fn balance_follows_wallet<A: LedgerApi>(
    mut wallet: watch::Receiver<WalletAddress>,
    balance: Arc<BalanceQuery<A>>,
) {
    while wallet.changed().await.is_ok() {
        let address = wallet.borrow_and_update().clone();
        balance.spawn_query(address);
    }
}
