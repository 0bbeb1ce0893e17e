//! Balance lookup command.

use crate::render;
use anyhow::{bail, Context, Result};
use blockvision_client::LedgerApi;
use blockvision_core::WalletAddress;
use clap::Args;
use std::sync::Arc;

#[derive(Args)]
pub struct BalanceArgs {
    /// Wallet address
    address: String,
}

pub async fn run<A: LedgerApi>(args: BalanceArgs, api: Arc<A>) -> Result<()> {
    let address = WalletAddress::from_input(&args.address);
    if address.is_empty() {
        bail!("Wallet address must not be empty");
    }

    let balance = api
        .fetch_balance(address.as_str())
        .await
        .with_context(|| format!("Failed to fetch balance for {}", address))?;

    println!();
    render::print_balance(address.as_str(), Some(balance));
    println!();
    Ok(())
}
