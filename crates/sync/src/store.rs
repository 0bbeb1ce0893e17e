//! Observable single-writer stores.

use std::sync::Arc;
use tokio::sync::watch;

/// A value that observers can read and subscribe to.
///
/// Backed by a `tokio::sync::watch` channel: every write replaces the value
/// as a whole and wakes all subscribers, and readers never see a partially
/// updated value. Only the component that owns a store writes to it; everyone
/// else gets a [`watch::Receiver`] through [`Store::subscribe`].
#[derive(Debug)]
pub struct Store<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T> Store<T> {
    /// Create a store holding `initial`.
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the value and notify subscribers, even if it did not change.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Modify the value in place and notify subscribers.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.tx.send_modify(f);
    }

    /// Read the value through a closure without cloning it.
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.tx.borrow())
    }

    /// Subscribe to changes. The current value counts as already seen.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Store<T> {
    /// Get a copy of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
