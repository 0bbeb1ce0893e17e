//! Block production trigger.

use crate::busy::BusyFlag;
use crate::cascade::{CascadeReport, RefreshCascade};
use crate::store::Store;
use blockvision_client::{ClientError, LedgerApi};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

pub const STATUS_MINING: &str = "Mining block...";
pub const STATUS_FAILED: &str = "Mining failed.";
pub const STATUS_ERROR: &str = "Error mining block.";

/// Errors that end a mining request.
#[derive(Debug, Clone, Error)]
pub enum MiningError {
    #[error("a mining request is already in flight")]
    Busy,

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// A block the service reports as mined.
#[derive(Debug, Clone)]
pub struct MiningReceipt {
    /// Confirmation text returned by the service.
    pub confirmation: String,
    pub cascade: CascadeReport,
}

/// Asks the service to produce a block, then refreshes.
pub struct MiningTrigger<A> {
    api: Arc<A>,
    cascade: RefreshCascade<A>,
    status: Store<Option<String>>,
    busy: BusyFlag,
}

impl<A: LedgerApi> MiningTrigger<A> {
    pub fn new(api: Arc<A>, cascade: RefreshCascade<A>) -> Self {
        Self {
            api,
            cascade,
            status: Store::default(),
            busy: BusyFlag::new(),
        }
    }

    /// The last user-facing status line.
    pub fn status(&self) -> Option<String> {
        self.status.get()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<Option<String>> {
        self.status.subscribe()
    }

    /// Check whether a mining request is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Request one block.
    ///
    /// On success the service's text becomes the status and the refresh
    /// cascade runs. Rejections and transport failures get distinct generic
    /// messages. Overlapping calls are turned away with [`MiningError::Busy`].
    pub async fn mine(&self) -> Result<MiningReceipt, MiningError> {
        let Some(_guard) = self.busy.try_acquire() else {
            return Err(MiningError::Busy);
        };

        self.status.set(Some(STATUS_MINING.to_string()));
        tracing::info!("requesting block production");

        match self.api.mine().await {
            Ok(confirmation) => {
                tracing::info!(%confirmation, "block mined");
                self.status.set(Some(confirmation.clone()));
                let cascade = self.cascade.run().await;
                Ok(MiningReceipt {
                    confirmation,
                    cascade,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "mining request failed");
                let message = if e.is_rejection() {
                    STATUS_FAILED
                } else {
                    STATUS_ERROR
                };
                self.status.set(Some(message.to_string()));
                Err(e.into())
            }
        }
    }
}
