//! Transfer submission command.

use crate::render;
use anyhow::{anyhow, Result};
use blockvision_client::LedgerApi;
use blockvision_core::WalletAddress;
use blockvision_sync::{Session, SubmissionError};
use clap::Args;
use colored::Colorize;
use std::sync::Arc;

#[derive(Args)]
pub struct SendArgs {
    /// Sender wallet address
    #[arg(short, long)]
    sender: String,

    /// Receiver wallet address
    #[arg(short, long)]
    receiver: String,

    /// Amount to transfer
    #[arg(short, long)]
    amount: String,
}

pub async fn run<A: LedgerApi>(args: SendArgs, api: Arc<A>) -> Result<()> {
    let session = Session::with_wallet(api, WalletAddress::from_input(&args.sender));
    let submission = session.submission();
    submission.set_sender(&args.sender);
    submission.set_receiver(&args.receiver);
    submission.set_amount(&args.amount);

    let outcome = session.submit().await;
    let status = submission.status().unwrap_or_default();
    match outcome {
        Ok(receipt) => {
            render::success(&status);
            let tx = &receipt.transaction;
            println!(
                "    {} -> {}: {}",
                tx.sender.bright_yellow(),
                tx.receiver.bright_yellow(),
                tx.amount.to_string().bright_cyan()
            );
            if !receipt.confirmation.is_empty() {
                println!("    {}", receipt.confirmation.bright_black());
            }
            let balance = session.balance_state();
            println!();
            render::print_balance(tx.sender.as_str(), balance.value);
            Ok(())
        }
        Err(SubmissionError::Validation(_)) => {
            render::failure(&status);
            Err(anyhow!("Transfer not sent"))
        }
        Err(e) => {
            render::failure(&status);
            Err(e.into())
        }
    }
}
