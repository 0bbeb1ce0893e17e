//! Copying the wallet address with a transient confirmation.

use crate::fence::Fence;
use crate::store::Store;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

pub const STATUS_COPIED: &str = "Wallet address copied!";
pub const STATUS_COPY_FAILED: &str = "Failed to copy wallet address.";

/// How long a copy message stays visible.
pub const COPY_MESSAGE_TTL: Duration = Duration::from_secs(2);

/// Errors from the platform clipboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// A short-lived claim on the clipboard. Released when dropped.
pub trait ClipboardHandle {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Hands out clipboard handles. Implementations must not keep a handle open
/// between acquisitions.
pub trait ClipboardProvider {
    type Handle: ClipboardHandle;

    fn acquire(&self) -> Result<Self::Handle, ClipboardError>;
}

/// Writes text to the clipboard and shows a message that clears itself.
///
/// Each copy supersedes the previous message; a pending clear only fires if
/// no newer copy happened in the meantime.
pub struct CopyFeedback {
    message: Store<Option<String>>,
    fence: Arc<Fence>,
    ttl: Duration,
}

impl CopyFeedback {
    pub fn new() -> Self {
        Self::with_ttl(COPY_MESSAGE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            message: Store::default(),
            fence: Arc::new(Fence::new()),
            ttl,
        }
    }

    /// The visible message, if any.
    pub fn message(&self) -> Option<String> {
        self.message.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.message.subscribe()
    }

    /// Copy `text` and schedule the message to clear. Must be called from
    /// within a tokio runtime.
    pub fn copy<C: ClipboardProvider>(
        &self,
        clipboard: &C,
        text: &str,
    ) -> Result<(), ClipboardError> {
        let result = clipboard
            .acquire()
            .and_then(|mut handle| handle.write_text(text));

        let message = match &result {
            Ok(()) => STATUS_COPIED,
            Err(e) => {
                tracing::warn!(error = %e, "copy to clipboard failed");
                STATUS_COPY_FAILED
            }
        };

        let ticket = self.fence.issue(());
        self.message.set(Some(message.to_string()));

        let fence = Arc::clone(&self.fence);
        let store = self.message.clone();
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            fence.if_latest(&ticket, || store.set(None));
        });

        result
    }
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new()
    }
}
