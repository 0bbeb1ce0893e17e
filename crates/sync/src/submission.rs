//! Transaction submission workflow.

use crate::busy::BusyFlag;
use crate::cascade::{CascadeReport, RefreshCascade};
use crate::store::Store;
use crate::wallet::WalletIdentity;
use blockvision_client::{ClientError, LedgerApi};
use blockvision_core::{Transaction, TransferForm, ValidationError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

pub const STATUS_ADDED: &str = "Transaction added successfully!";
pub const STATUS_REJECTED: &str = "Transaction failed.";
pub const STATUS_ERROR: &str = "Error submitting transaction.";
pub const STATUS_BUSY: &str = "A transaction is already being submitted.";

/// Errors that end a submission attempt.
#[derive(Debug, Clone, Error)]
pub enum SubmissionError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("a submission is already in flight")]
    Busy,

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Where a submission currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// A transfer the service accepted.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub transaction: Transaction,
    /// Confirmation text returned by the service.
    pub confirmation: String,
    pub cascade: CascadeReport,
}

/// Validates the transfer form, posts it, and refreshes on success.
///
/// The form is kept across failures so the user can correct and resubmit.
/// After an accepted transfer the sender is reset to the active wallet and
/// the other fields are cleared before the refresh cascade runs.
///
/// Phases go `Idle -> Validating -> Submitting -> Succeeded | Failed`; the
/// outcome phase is held until the form is edited, which returns to `Idle`.
pub struct TransactionSubmission<A> {
    api: Arc<A>,
    wallet: Arc<WalletIdentity>,
    cascade: RefreshCascade<A>,
    form: Store<TransferForm>,
    phase: Store<SubmissionPhase>,
    status: Store<Option<String>>,
    busy: BusyFlag,
}

impl<A: LedgerApi> TransactionSubmission<A> {
    /// Create a submission workflow with the sender pre-filled from the wallet.
    pub fn new(api: Arc<A>, wallet: Arc<WalletIdentity>, cascade: RefreshCascade<A>) -> Self {
        let form = TransferForm::for_sender(wallet.active().as_str());
        Self {
            api,
            wallet,
            cascade,
            form: Store::new(form),
            phase: Store::default(),
            status: Store::default(),
            busy: BusyFlag::new(),
        }
    }

    /// The current form contents.
    pub fn form(&self) -> TransferForm {
        self.form.get()
    }

    pub fn set_sender(&self, sender: &str) {
        self.edit(|form| form.sender = sender.to_string());
    }

    pub fn set_receiver(&self, receiver: &str) {
        self.edit(|form| form.receiver = receiver.to_string());
    }

    pub fn set_amount(&self, amount: &str) {
        self.edit(|form| form.amount = amount.to_string());
    }

    /// The current phase.
    pub fn phase(&self) -> SubmissionPhase {
        self.phase.get()
    }

    /// The last user-facing status line.
    pub fn status(&self) -> Option<String> {
        self.status.get()
    }

    pub fn subscribe_form(&self) -> watch::Receiver<TransferForm> {
        self.form.subscribe()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<SubmissionPhase> {
        self.phase.subscribe()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<Option<String>> {
        self.status.subscribe()
    }

    /// Check whether a submission is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Submit the current form.
    ///
    /// A call made while another submission is in flight is rejected with
    /// [`SubmissionError::Busy`] and sends nothing.
    pub async fn submit(&self) -> Result<SubmissionReceipt, SubmissionError> {
        let Some(_guard) = self.busy.try_acquire() else {
            self.status.set(Some(STATUS_BUSY.to_string()));
            return Err(SubmissionError::Busy);
        };

        self.status.set(None);
        self.phase.set(SubmissionPhase::Validating);

        let transaction = match self.form.with(TransferForm::validate) {
            Ok(tx) => tx,
            Err(e) => {
                tracing::debug!(error = %e, "transfer rejected before sending");
                self.finish(SubmissionPhase::Failed, e.user_message().to_string());
                return Err(e.into());
            }
        };

        self.phase.set(SubmissionPhase::Submitting);
        tracing::info!(
            sender = %transaction.sender,
            receiver = %transaction.receiver,
            amount = transaction.amount,
            "submitting transaction"
        );

        match self.api.submit_transaction(&transaction).await {
            Ok(confirmation) => {
                let wallet = self.wallet.active();
                self.form.update(|form| form.reset(wallet.as_str()));
                self.finish(SubmissionPhase::Succeeded, STATUS_ADDED.to_string());

                let cascade = self.cascade.run().await;
                Ok(SubmissionReceipt {
                    transaction,
                    confirmation,
                    cascade,
                })
            }
            Err(e) => {
                let message = match e.server_message() {
                    Some(message) => message.to_string(),
                    None if e.is_rejection() => STATUS_REJECTED.to_string(),
                    None => STATUS_ERROR.to_string(),
                };
                tracing::warn!(error = %e, "transaction submission failed");
                self.finish(SubmissionPhase::Failed, message);
                Err(e.into())
            }
        }
    }

    /// Publish the outcome. It stays visible until the form is edited.
    fn finish(&self, outcome: SubmissionPhase, status: String) {
        self.status.set(Some(status));
        self.phase.set(outcome);
    }

    fn edit<F: FnOnce(&mut TransferForm)>(&self, f: F) {
        self.form.update(f);
        if !self.busy.is_busy() {
            self.phase.set(SubmissionPhase::Idle);
        }
    }
}
