use blockvision_client::{ClientError, LedgerApi, Result};
use blockvision_core::{Block, Direction, Transaction, ValidationError, WalletAddress};
use blockvision_sync::clipboard::{STATUS_COPIED, STATUS_COPY_FAILED};
use blockvision_sync::{
    mining, submission, BalanceState, ClipboardError, ClipboardHandle, ClipboardProvider,
    MiningError, Session, SubmissionError, SubmissionPhase,
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// In-memory ledger service.
///
/// Accepted transfers wait in a pool until `mine` seals them into a block.
/// Balance and write requests can be held back with gates to control the
/// order in which responses arrive.
#[derive(Default)]
struct FakeLedger {
    chain: Mutex<Vec<Block>>,
    pool: Mutex<Vec<Transaction>>,
    balances: Mutex<HashMap<String, f64>>,
    balance_gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    write_gate: Mutex<Option<oneshot::Receiver<()>>>,
    submit_failure: Mutex<Option<ClientError>>,
    mine_failure: Mutex<Option<ClientError>>,
    chain_fetches: AtomicUsize,
    balance_fetches: AtomicUsize,
    posts: AtomicUsize,
}

impl FakeLedger {
    fn new() -> Arc<Self> {
        let ledger = Self::default();
        ledger.chain.lock().unwrap().push(block(0, vec![]));
        Arc::new(ledger)
    }

    fn set_balance(&self, address: &str, balance: f64) {
        self.balances
            .lock()
            .unwrap()
            .insert(address.to_string(), balance);
    }

    /// Hold the next balance response for `address` until the sender fires.
    fn gate_balance(&self, address: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.balance_gates
            .lock()
            .unwrap()
            .insert(address.to_string(), rx);
        tx
    }

    /// Hold the next submit or mine response until the sender fires.
    fn gate_write(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.write_gate.lock().unwrap() = Some(rx);
        tx
    }

    fn fail_submit(&self, error: ClientError) {
        *self.submit_failure.lock().unwrap() = Some(error);
    }

    fn fail_mine(&self, error: ClientError) {
        *self.mine_failure.lock().unwrap() = Some(error);
    }

    fn chain_fetches(&self) -> usize {
        self.chain_fetches.load(Ordering::SeqCst)
    }

    fn balance_fetches(&self) -> usize {
        self.balance_fetches.load(Ordering::SeqCst)
    }

    fn posts(&self) -> usize {
        self.posts.load(Ordering::SeqCst)
    }

    async fn pass_write_gate(&self) {
        let gate = self.write_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

impl LedgerApi for FakeLedger {
    async fn fetch_chain(&self) -> Result<Vec<Block>> {
        self.chain_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.chain.lock().unwrap().clone())
    }

    async fn fetch_balance(&self, address: &str) -> Result<f64> {
        self.balance_fetches.fetch_add(1, Ordering::SeqCst);
        let gate = self.balance_gates.lock().unwrap().remove(address);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let balance = self.balances.lock().unwrap().get(address).copied();
        Ok(balance.unwrap_or(0.0))
    }

    async fn submit_transaction(&self, tx: &Transaction) -> Result<String> {
        self.posts.fetch_add(1, Ordering::SeqCst);
        self.pass_write_gate().await;
        let failure = self.submit_failure.lock().unwrap().take();
        if let Some(e) = failure {
            return Err(e);
        }
        self.pool.lock().unwrap().push(tx.clone());
        Ok("Transaction will be added to the next block".to_string())
    }

    async fn mine(&self) -> Result<String> {
        self.posts.fetch_add(1, Ordering::SeqCst);
        self.pass_write_gate().await;
        let failure = self.mine_failure.lock().unwrap().take();
        if let Some(e) = failure {
            return Err(e);
        }
        let transactions = std::mem::take(&mut *self.pool.lock().unwrap());
        let mut chain = self.chain.lock().unwrap();
        let index = chain.len() as u64;
        chain.push(block(index, transactions));
        Ok(format!("Block #{index} mined"))
    }
}

fn block(index: u64, transactions: Vec<Transaction>) -> Block {
    Block {
        index,
        hash: format!("{index:064x}"),
        previous_hash: if index == 0 {
            "0".to_string()
        } else {
            format!("{:064x}", index - 1)
        },
        timestamp: 1_700_000_000.0 + index as f64,
        nonce: 0,
        transactions,
    }
}

/// Yield until `condition` holds.
async fn until(condition: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition not reached");
}

/// Run `first` and `then` concurrently, starting `then` only once `ready`.
async fn interleave<F, G>(first: F, ready: impl Fn() -> bool, then: G) -> (F::Output, G::Output)
where
    F: Future,
    G: Future,
{
    tokio::join!(first, async {
        until(ready).await;
        then.await
    })
}

fn session(api: &Arc<FakeLedger>, address: &str) -> Session<FakeLedger> {
    Session::with_wallet(api.clone(), WalletAddress::from(address))
}

#[tokio::test]
async fn test_start_loads_chain_and_balance() {
    let api = FakeLedger::new();
    api.set_balance("W1", 42.0);
    let session = session(&api, "W1");

    let report = session.start().await;
    assert!(report.is_complete());
    assert_eq!(session.snapshot().len(), 1);
    assert_eq!(session.balance_state().value, Some(42.0));
    assert!(!session.balance_state().loading);
    assert!(!session.ledger().is_loading());
}

#[tokio::test]
async fn test_late_balance_for_previous_wallet_is_discarded() {
    let api = FakeLedger::new();
    api.set_balance("W1", 10.0);
    api.set_balance("W2", 20.0);
    let session = session(&api, "W1");
    let release_w1 = api.gate_balance("W1");

    let (w1, ()) = interleave(
        session.balance().refresh(),
        || api.balance_fetches() == 1,
        async {
            session.set_wallet("W2");
            let mut state = session.balance().subscribe();
            state.wait_for(|s| s.value == Some(20.0)).await.unwrap();
            release_w1.send(()).unwrap();
        },
    )
    .await;

    // The caller still sees its own result; the shared state does not.
    assert_eq!(w1.unwrap(), Some(10.0));
    let state = session.balance_state();
    assert_eq!(state.value, Some(20.0));
    assert!(!state.loading);
}

#[tokio::test]
async fn test_early_balance_for_previous_wallet_is_discarded() {
    let api = FakeLedger::new();
    api.set_balance("W1", 10.0);
    api.set_balance("W2", 20.0);
    let session = session(&api, "W1");
    let release_w1 = api.gate_balance("W1");
    let release_w2 = api.gate_balance("W2");

    let (w1, ()) = interleave(
        session.balance().refresh(),
        || api.balance_fetches() == 1,
        async {
            session.set_wallet("W2");
            until(|| api.balance_fetches() == 2).await;
            release_w1.send(()).unwrap();
        },
    )
    .await;
    assert_eq!(w1.unwrap(), Some(10.0));

    // W1 answered first but W2 is active: nothing committed yet.
    let state = session.balance_state();
    assert_eq!(state.value, None);
    assert!(state.loading);

    release_w2.send(()).unwrap();
    let mut state = session.balance().subscribe();
    state
        .wait_for(|s| s.value == Some(20.0) && !s.loading)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_wallet_reset_restores_generated_address() {
    let api = FakeLedger::new();
    let session = Session::new(api.clone());
    let own = session.wallet().own_address().clone();

    session.set_wallet("  W9  ");
    assert_eq!(session.wallet().active().as_str(), "W9");
    assert!(session.wallet().is_overridden());

    assert_eq!(session.reset_wallet(), own);
    assert!(!session.wallet().is_overridden());
}

#[tokio::test]
async fn test_incomplete_form_is_not_sent() {
    let api = FakeLedger::new();
    let session = session(&api, "W1");
    let submission = session.submission();
    submission.set_receiver("W2");

    let err = session.submit().await.unwrap_err();
    assert!(matches!(
        err,
        SubmissionError::Validation(ValidationError::MissingField("amount"))
    ));
    assert_eq!(submission.status().as_deref(), Some("Please fill all fields."));
    assert_eq!(submission.phase(), SubmissionPhase::Failed);

    submission.set_amount("5");
    submission.set_sender("   ");
    assert_eq!(submission.phase(), SubmissionPhase::Idle);
    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, SubmissionError::Validation(_)));

    assert_eq!(api.posts(), 0);
    assert_eq!(api.chain_fetches(), 0);
}

#[tokio::test]
async fn test_invalid_amount_is_not_sent() {
    let api = FakeLedger::new();
    let session = session(&api, "W1");
    session.submission().set_receiver("W2");

    for amount in ["abc", "0", "-3", "NaN"] {
        session.submission().set_amount(amount);
        let err = session.submit().await.unwrap_err();
        assert!(
            matches!(
                err,
                SubmissionError::Validation(ValidationError::InvalidAmount(_))
            ),
            "{amount}"
        );
    }
    assert_eq!(
        session.submission().status().as_deref(),
        Some("Amount must be a positive number.")
    );
    assert_eq!(api.posts(), 0);
}

#[tokio::test]
async fn test_accepted_transfer_resets_form_and_refreshes() {
    let api = FakeLedger::new();
    api.set_balance("W1", 100.0);
    let session = session(&api, "W1");
    session.start().await;
    let (chain_before, balance_before) = (api.chain_fetches(), api.balance_fetches());

    let submission = session.submission();
    submission.set_receiver("W2");
    submission.set_amount(" 12.5 ");

    let receipt = session.submit().await.unwrap();
    assert_eq!(receipt.transaction, Transaction::new("W1", "W2", 12.5));
    assert!(receipt.cascade.is_complete());

    let form = submission.form();
    assert_eq!(form.sender, "W1");
    assert!(form.receiver.is_empty());
    assert!(form.amount.is_empty());
    assert_eq!(submission.phase(), SubmissionPhase::Succeeded);
    assert_eq!(submission.status().as_deref(), Some(submission::STATUS_ADDED));

    assert_eq!(api.posts(), 1);
    assert_eq!(api.chain_fetches(), chain_before + 1);
    assert!(api.balance_fetches() > balance_before);
}

#[tokio::test]
async fn test_rejected_transfer_keeps_form() {
    let api = FakeLedger::new();
    let session = session(&api, "W1");
    let submission = session.submission();
    submission.set_receiver("W2");
    submission.set_amount("900");
    let filled = submission.form();

    let cases = [
        (
            ClientError::Rejected {
                status: 400,
                message: Some("Insufficient balance".into()),
            },
            "Insufficient balance",
        ),
        (
            ClientError::Rejected {
                status: 400,
                message: None,
            },
            submission::STATUS_REJECTED,
        ),
        (
            ClientError::Connect("connection refused".into()),
            submission::STATUS_ERROR,
        ),
    ];

    for (error, expected) in cases {
        api.fail_submit(error);
        let err = session.submit().await.unwrap_err();
        assert!(matches!(err, SubmissionError::Client(_)));
        assert_eq!(submission.status().as_deref(), Some(expected));
        assert_eq!(submission.phase(), SubmissionPhase::Failed);
        assert_eq!(submission.form(), filled);
    }

    assert_eq!(api.posts(), 3);
    assert_eq!(api.chain_fetches(), 0);
}

#[tokio::test]
async fn test_overlapping_submit_is_turned_away() {
    let api = FakeLedger::new();
    let session = session(&api, "W1");
    session.submission().set_receiver("W2");
    session.submission().set_amount("1");
    let release = api.gate_write();

    let (first, second) = interleave(session.submit(), || api.posts() == 1, async {
        assert!(session.submission().is_busy());
        let second = session.submit().await;
        release.send(()).unwrap();
        second
    })
    .await;

    assert!(first.is_ok());
    assert!(matches!(second, Err(SubmissionError::Busy)));
    assert_eq!(api.posts(), 1);
    assert!(!session.submission().is_busy());
}

#[tokio::test]
async fn test_mining_reports_status_and_refreshes() {
    let api = FakeLedger::new();
    let session = session(&api, "W1");
    session.submission().set_receiver("W2");
    session.submission().set_amount("5");
    session.submit().await.unwrap();
    assert!(session.wallet_history().entries.is_empty());

    let release = api.gate_write();
    let (receipt, ()) = interleave(session.mine(), || api.posts() == 2, async {
        assert_eq!(
            session.mining().status().as_deref(),
            Some(mining::STATUS_MINING)
        );
        release.send(()).unwrap();
    })
    .await;

    let receipt = receipt.unwrap();
    assert_eq!(receipt.confirmation, "Block #1 mined");
    assert!(receipt.cascade.is_complete());
    assert_eq!(session.mining().status().as_deref(), Some("Block #1 mined"));
    assert_eq!(session.snapshot().len(), 2);

    let history = session.wallet_history();
    assert_eq!(history.entries.len(), 1);
    assert_eq!(history.entries[0].direction, Direction::Sent);
    assert_eq!(history.entries[0].counterparty(), "W2");
}

#[tokio::test]
async fn test_mining_failures() {
    let api = FakeLedger::new();
    let session = session(&api, "W1");

    api.fail_mine(ClientError::Rejected {
        status: 500,
        message: Some("boom".into()),
    });
    assert!(matches!(session.mine().await, Err(MiningError::Client(_))));
    assert_eq!(
        session.mining().status().as_deref(),
        Some(mining::STATUS_FAILED)
    );

    api.fail_mine(ClientError::Timeout("timed out".into()));
    assert!(session.mine().await.is_err());
    assert_eq!(
        session.mining().status().as_deref(),
        Some(mining::STATUS_ERROR)
    );
    assert_eq!(api.chain_fetches(), 0);
}

#[tokio::test]
async fn test_mining_without_wallet_skips_balance() {
    let api = FakeLedger::new();
    let session = Session::without_wallet(api.clone());

    let receipt = session.mine().await.unwrap();

    assert!(receipt.cascade.is_complete());
    assert_eq!(session.snapshot().len(), 2);
    assert_eq!(session.balance_state(), BalanceState::default());
    assert_eq!(api.chain_fetches(), 1);
    assert_eq!(api.balance_fetches(), 0);
}

#[tokio::test]
async fn test_overlapping_mine_is_turned_away() {
    let api = FakeLedger::new();
    let session = session(&api, "W1");
    let release = api.gate_write();

    let (first, second) = interleave(session.mine(), || api.posts() == 1, async {
        let second = session.mine().await;
        release.send(()).unwrap();
        second
    })
    .await;

    assert!(first.is_ok());
    assert!(matches!(second, Err(MiningError::Busy)));
    assert_eq!(api.posts(), 1);
}

#[tokio::test]
async fn test_history_follows_wallet() {
    let api = FakeLedger::new();
    api.chain.lock().unwrap().push(block(
        1,
        vec![
            Transaction::new("W1", "W2", 5.0),
            Transaction::new("W3", "W1", 2.0),
        ],
    ));
    let session = session(&api, "W1");
    let mut published = session.history().subscribe();
    session.start().await;

    published
        .wait_for(|h| h.address.as_str() == "W1" && h.entries.len() == 2)
        .await
        .unwrap();
    let history = session.wallet_history();
    assert_eq!(history.entries[0].direction, Direction::Sent);
    assert_eq!(history.entries[1].direction, Direction::Received);

    session.set_wallet("W2");
    let history = session.wallet_history();
    assert_eq!(history.address.as_str(), "W2");
    assert_eq!(history.entries.len(), 1);
    assert_eq!(history.entries[0].direction, Direction::Received);

    published
        .wait_for(|h| h.address.as_str() == "W2")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_refresh_failure_keeps_snapshot() {
    struct Flaky {
        inner: Arc<FakeLedger>,
        down: Mutex<bool>,
    }

    impl LedgerApi for Flaky {
        async fn fetch_chain(&self) -> Result<Vec<Block>> {
            let down = *self.down.lock().unwrap();
            if down {
                return Err(ClientError::Connect("refused".into()));
            }
            self.inner.fetch_chain().await
        }

        async fn fetch_balance(&self, address: &str) -> Result<f64> {
            self.inner.fetch_balance(address).await
        }

        async fn submit_transaction(&self, tx: &Transaction) -> Result<String> {
            self.inner.submit_transaction(tx).await
        }

        async fn mine(&self) -> Result<String> {
            self.inner.mine().await
        }
    }

    let api = Arc::new(Flaky {
        inner: FakeLedger::new(),
        down: Mutex::new(false),
    });
    let session = Session::with_wallet(api.clone(), WalletAddress::from("W1"));
    session.start().await;
    let before = session.snapshot();

    *api.down.lock().unwrap() = true;
    let report = session.refresh().await;
    assert!(report.chain.is_err());
    assert!(report.balance.is_ok());
    assert!(session.snapshot().ptr_eq(&before));
    assert!(!session.ledger().is_loading());
}

struct TestClipboard {
    contents: Arc<Mutex<String>>,
    available: bool,
}

struct TestHandle(Arc<Mutex<String>>);

impl ClipboardHandle for TestHandle {
    fn write_text(&mut self, text: &str) -> std::result::Result<(), ClipboardError> {
        *self.0.lock().unwrap() = text.to_string();
        Ok(())
    }
}

impl ClipboardProvider for TestClipboard {
    type Handle = TestHandle;

    fn acquire(&self) -> std::result::Result<TestHandle, ClipboardError> {
        if !self.available {
            return Err(ClipboardError::Unavailable("headless".into()));
        }
        Ok(TestHandle(self.contents.clone()))
    }
}

#[tokio::test(start_paused = true)]
async fn test_copy_address_message_expires() {
    let api = FakeLedger::new();
    let session = session(&api, "W1");
    session.set_wallet("W7");
    let clipboard = TestClipboard {
        contents: Arc::default(),
        available: true,
    };

    session.copy_address(&clipboard).unwrap();
    assert_eq!(*clipboard.contents.lock().unwrap(), "W7");
    assert_eq!(
        session.copy_feedback().message().as_deref(),
        Some(STATUS_COPIED)
    );

    tokio::time::sleep(Duration::from_millis(2001)).await;
    assert_eq!(session.copy_feedback().message(), None);

    let broken = TestClipboard {
        contents: Arc::default(),
        available: false,
    };
    assert!(session.copy_address(&broken).is_err());
    assert_eq!(
        session.copy_feedback().message().as_deref(),
        Some(STATUS_COPY_FAILED)
    );
}
