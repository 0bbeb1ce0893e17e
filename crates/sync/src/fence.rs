//! Request fencing.
//!
//! Requests carry no cancellation token. Instead, each outgoing request is
//! tagged with a [`Ticket`] holding the key it targets and its issue order.
//! When the response arrives the ticket is checked against current state and
//! the result is committed only if it is still relevant:
//!
//! - the key it targets must still be the active key
//! - no request issued later may have committed first
//!
//! The check and the write happen under one lock, so two responses can never
//! interleave their commits.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

/// Tag attached to an in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    seq: u64,
}

impl<K> Ticket<K> {
    /// The key the request was issued for.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Issue order (1-based).
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Why a response was not committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stale {
    /// The active key changed after the request was issued.
    KeyChanged,
    /// A request issued later has already committed.
    Superseded,
}

#[derive(Debug)]
struct FenceState<K> {
    issued: u64,
    committed: u64,
    /// Newest ticket issued per key. Keys whose newest ticket can no longer
    /// commit are pruned.
    newest: HashMap<K, u64>,
}

/// Issues tickets and decides whether their results may be committed.
#[derive(Debug)]
pub struct Fence<K = ()> {
    state: Mutex<FenceState<K>>,
}

impl<K> Default for Fence<K> {
    fn default() -> Self {
        Self {
            state: Mutex::new(FenceState {
                issued: 0,
                committed: 0,
                newest: HashMap::new(),
            }),
        }
    }
}

impl<K: Eq + Hash + Clone> Fence<K> {
    /// Create a fence with no outstanding tickets.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FenceState<K>> {
        // No update spans a panic point; a poisoned state is still consistent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Tag a new request for `key`.
    pub fn issue(&self, key: K) -> Ticket<K> {
        let mut state = self.lock();
        state.issued += 1;
        let seq = state.issued;
        state.newest.insert(key.clone(), seq);
        Ticket { key, seq }
    }

    /// Run `commit` if `ticket` still targets `current` and nothing newer has
    /// committed.
    ///
    /// `commit` receives `true` when no later ticket was issued for the same
    /// key, i.e. nothing for `current` is still pending behind it. Tickets for
    /// other keys do not count: they can never commit while `current` is
    /// active.
    pub fn commit<R, F>(&self, ticket: &Ticket<K>, current: &K, commit: F) -> Result<R, Stale>
    where
        F: FnOnce(bool) -> R,
    {
        let mut state = self.lock();
        if ticket.key != *current {
            return Err(Stale::KeyChanged);
        }
        if ticket.seq <= state.committed {
            return Err(Stale::Superseded);
        }
        state.committed = ticket.seq;
        let latest = state
            .newest
            .get(&ticket.key)
            .map_or(true, |&newest| newest == ticket.seq);
        let committed = state.committed;
        state.newest.retain(|_, newest| *newest > committed);
        Ok(commit(latest))
    }

    /// Run `f` only if no ticket has been issued after `ticket`.
    pub fn if_latest<R, F>(&self, ticket: &Ticket<K>, f: F) -> Option<R>
    where
        F: FnOnce() -> R,
    {
        let state = self.lock();
        (ticket.seq == state.issued).then(f)
    }

    /// Check whether `ticket` is the most recently issued one.
    pub fn is_latest(&self, ticket: &Ticket<K>) -> bool {
        self.lock().issued == ticket.seq
    }
}
