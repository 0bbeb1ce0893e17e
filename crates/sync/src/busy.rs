//! Single-flight guard for user actions.

use std::sync::atomic::{AtomicBool, Ordering};

/// Marks an action as running so an overlapping call can be turned away.
#[derive(Debug, Default)]
pub struct BusyFlag {
    busy: AtomicBool,
}

/// Releases its [`BusyFlag`] when dropped.
#[derive(Debug)]
pub struct BusyGuard<'a> {
    flag: &'a BusyFlag,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the flag, or `None` if the action is already running.
    pub fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard { flag: self })
    }

    /// Check whether the action is running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.busy.store(false, Ordering::Release);
    }
}
