//! Ledger snapshot store.

use crate::fence::{Fence, Stale};
use crate::store::Store;
use blockvision_client::{ClientError, LedgerApi};
use blockvision_core::LedgerSnapshot;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Holds the latest successfully fetched chain.
///
/// A refresh replaces the snapshot wholesale; a failed refresh leaves it
/// untouched. Refreshes are fenced by issue order, so a slow response never
/// overwrites a snapshot fetched by a refresh started after it.
pub struct LedgerStore<A> {
    api: Arc<A>,
    snapshot: Store<LedgerSnapshot>,
    loading: Store<bool>,
    in_flight: AtomicUsize,
    fence: Fence,
}

/// Keeps the loading flag raised while at least one refresh is running.
struct InFlight<'a> {
    count: &'a AtomicUsize,
    loading: &'a Store<bool>,
}

impl<'a> InFlight<'a> {
    fn enter(count: &'a AtomicUsize, loading: &'a Store<bool>) -> Self {
        if count.fetch_add(1, Ordering::SeqCst) == 0 {
            loading.set(true);
        }
        Self { count, loading }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.loading.set(false);
        }
    }
}

impl<A: LedgerApi> LedgerStore<A> {
    /// Create an empty store.
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            snapshot: Store::default(),
            loading: Store::new(false),
            in_flight: AtomicUsize::new(0),
            fence: Fence::new(),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.snapshot.get()
    }

    /// Check whether a refresh is running.
    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Subscribe to snapshot replacements.
    pub fn subscribe(&self) -> watch::Receiver<LedgerSnapshot> {
        self.snapshot.subscribe()
    }

    /// Subscribe to the loading flag.
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Fetch the chain once and replace the snapshot on success.
    ///
    /// Returns the fetched snapshot even when a newer refresh had already
    /// committed and this result was discarded.
    pub async fn refresh(&self) -> Result<LedgerSnapshot, ClientError> {
        let ticket = self.fence.issue(());
        let _in_flight = InFlight::enter(&self.in_flight, &self.loading);
        tracing::debug!(seq = ticket.seq(), "refreshing chain");

        let blocks = match self.api.fetch_chain().await {
            Ok(blocks) => blocks,
            Err(e) => {
                tracing::warn!(error = %e, "chain refresh failed, keeping previous snapshot");
                return Err(e);
            }
        };

        let snapshot = LedgerSnapshot::new(blocks);
        match self
            .fence
            .commit(&ticket, &(), |_| self.snapshot.set(snapshot.clone()))
        {
            Ok(()) => tracing::debug!(blocks = snapshot.len(), "chain snapshot replaced"),
            Err(Stale::Superseded) | Err(Stale::KeyChanged) => {
                tracing::debug!(seq = ticket.seq(), "discarding superseded chain response")
            }
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockvision_client::Result;
    use blockvision_core::{Block, Transaction};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    type Gate = Option<oneshot::Receiver<()>>;

    /// Serves queued chain responses in order. A gated response is held
    /// until its sender fires.
    #[derive(Default)]
    struct ScriptedChain {
        responses: Mutex<VecDeque<(Gate, Result<Vec<Block>>)>>,
        calls: AtomicUsize,
    }

    impl ScriptedChain {
        fn push(&self, response: Result<Vec<Block>>) {
            self.responses.lock().unwrap().push_back((None, response));
        }

        fn push_gated(&self, response: Result<Vec<Block>>) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.responses.lock().unwrap().push_back((Some(rx), response));
            tx
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl LedgerApi for ScriptedChain {
        async fn fetch_chain(&self) -> Result<Vec<Block>> {
            let next = self.responses.lock().unwrap().pop_front();
            self.calls.fetch_add(1, Ordering::SeqCst);
            let Some((gate, response)) = next else {
                return Err(ClientError::Connect("script exhausted".into()));
            };
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            response
        }

        async fn fetch_balance(&self, _address: &str) -> Result<f64> {
            unreachable!("ledger store never fetches balances")
        }

        async fn submit_transaction(&self, _tx: &Transaction) -> Result<String> {
            unreachable!("ledger store never submits")
        }

        async fn mine(&self) -> Result<String> {
            unreachable!("ledger store never mines")
        }
    }

    async fn until(condition: impl Fn() -> bool) {
        while !condition() {
            tokio::task::yield_now().await;
        }
    }

    fn chain(len: u64) -> Vec<Block> {
        (0..len)
            .map(|index| Block {
                index,
                hash: format!("{:064x}", index + 1),
                previous_hash: format!("{:064x}", index),
                timestamp: 0.0,
                nonce: 0,
                transactions: vec![],
            })
            .collect()
    }

    #[tokio::test]
    async fn test_refresh_replaces_snapshot() {
        let api = Arc::new(ScriptedChain::default());
        api.push(Ok(chain(1)));
        api.push(Ok(chain(3)));
        let store = LedgerStore::new(api);

        assert!(store.snapshot().is_empty());
        store.refresh().await.unwrap();
        assert_eq!(store.snapshot().len(), 1);
        store.refresh().await.unwrap();
        assert_eq!(store.snapshot().len(), 3);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_snapshot() {
        let api = Arc::new(ScriptedChain::default());
        api.push(Ok(chain(2)));
        api.push(Err(ClientError::Timeout("slow".into())));
        api.push(Err(ClientError::InvalidResponse("garbage".into())));
        let store = LedgerStore::new(api);

        store.refresh().await.unwrap();
        let before = store.snapshot();

        assert!(store.refresh().await.is_err());
        assert!(store.refresh().await.is_err());

        let after = store.snapshot();
        assert!(before.ptr_eq(&after));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_failed_refresh_does_not_notify() {
        let api = Arc::new(ScriptedChain::default());
        api.push(Err(ClientError::Connect("refused".into())));
        let store = LedgerStore::new(api);
        let rx = store.subscribe();

        assert!(store.refresh().await.is_err());
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_slow_older_response_is_discarded() {
        let api = Arc::new(ScriptedChain::default());
        let release = api.push_gated(Ok(chain(1)));
        api.push(Ok(chain(3)));
        let store = LedgerStore::new(api.clone());

        let (older, ()) = tokio::join!(store.refresh(), async {
            until(|| api.calls() == 1).await;
            store.refresh().await.unwrap();
            assert_eq!(store.snapshot().len(), 3);
            assert!(store.is_loading());
            release.send(()).unwrap();
        });

        assert_eq!(older.unwrap().len(), 1);
        assert_eq!(store.snapshot().len(), 3);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_loading_holds_until_last_refresh_settles() {
        let api = Arc::new(ScriptedChain::default());
        let first_gate = api.push_gated(Ok(chain(2)));
        let second_gate = api.push_gated(Ok(chain(3)));
        let store = LedgerStore::new(api.clone());

        let (first, second, ()) = tokio::join!(store.refresh(), store.refresh(), async {
            until(|| api.calls() == 2).await;
            assert!(store.is_loading());
            first_gate.send(()).unwrap();

            until(|| store.snapshot().len() == 2).await;
            assert!(store.is_loading());
            second_gate.send(()).unwrap();
        });

        assert_eq!(first.unwrap().len(), 2);
        assert_eq!(second.unwrap().len(), 3);
        assert_eq!(store.snapshot().len(), 3);
        assert!(!store.is_loading());
    }
}
