//! Wallet history command.

use crate::render;
use anyhow::{bail, Context, Result};
use blockvision_client::LedgerApi;
use blockvision_core::WalletAddress;
use blockvision_sync::Session;
use clap::Args;
use std::sync::Arc;

#[derive(Args)]
pub struct HistoryArgs {
    /// Wallet address
    address: String,
}

pub async fn run<A: LedgerApi>(args: HistoryArgs, api: Arc<A>) -> Result<()> {
    let address = WalletAddress::from_input(&args.address);
    if address.is_empty() {
        bail!("Wallet address must not be empty");
    }

    let session = Session::with_wallet(api, address);
    session.ledger().refresh().await.context("Failed to fetch chain")?;

    render::print_history(&session.wallet_history());
    Ok(())
}
