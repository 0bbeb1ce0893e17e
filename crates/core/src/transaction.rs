//! Transactions and the transfer form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors detected on the client before a transfer is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
}

impl ValidationError {
    /// The message shown to the user for this error.
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "Please fill all fields.",
            ValidationError::InvalidAmount(_) => "Amount must be a positive number.",
        }
    }
}

/// A transfer recorded in a block.
///
/// The ledger service assigns no transaction identifier, so two transfers with
/// the same fields are indistinguishable except by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender's wallet address.
    pub sender: String,
    /// Recipient's wallet address.
    pub receiver: String,
    /// Amount transferred.
    pub amount: f64,
}

impl Transaction {
    /// Create a new transfer.
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }

    /// Check if the given address is the sender or the receiver.
    pub fn involves(&self, address: &str) -> bool {
        self.sender == address || self.receiver == address
    }
}

/// Raw, user-edited transfer fields.
///
/// Fields hold exactly what the user typed; [`TransferForm::validate`] turns
/// them into a [`Transaction`] ready to be posted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub sender: String,
    pub receiver: String,
    pub amount: String,
}

impl TransferForm {
    /// Create a form with the sender pre-filled.
    pub fn for_sender(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            ..Self::default()
        }
    }

    /// Validate the form and build the transfer payload.
    ///
    /// Sender and receiver are trimmed. The amount must parse as a finite
    /// number greater than zero; no upper bound is applied.
    pub fn validate(&self) -> Result<Transaction, ValidationError> {
        let sender = self.sender.trim();
        let receiver = self.receiver.trim();
        let amount = self.amount.trim();

        if sender.is_empty() {
            return Err(ValidationError::MissingField("sender"));
        }
        if receiver.is_empty() {
            return Err(ValidationError::MissingField("receiver"));
        }
        if amount.is_empty() {
            return Err(ValidationError::MissingField("amount"));
        }

        let value: f64 = amount
            .parse()
            .map_err(|_| ValidationError::InvalidAmount(amount.to_string()))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::InvalidAmount(amount.to_string()));
        }

        Ok(Transaction::new(sender, receiver, value))
    }

    /// Reset after a confirmed submission: sender back to `wallet`, the rest cleared.
    pub fn reset(&mut self, wallet: &str) {
        self.sender = wallet.to_string();
        self.receiver.clear();
        self.amount.clear();
    }
}
