//! CLI commands module.

use anyhow::{Context, Result};
use blockvision_client::{ClientConfig, HttpLedgerClient};
use clap::Subcommand;
use std::sync::Arc;

mod address;
mod balance;
mod chain;
mod history;
mod mine;
mod send;

#[derive(Subcommand)]
pub enum Commands {
    /// List blocks on the chain
    Chain(chain::ChainArgs),
    /// Show a wallet's balance
    Balance(balance::BalanceArgs),
    /// Show a wallet's transaction history
    History(history::HistoryArgs),
    /// Submit a transfer
    Send(send::SendArgs),
    /// Ask the node to mine a block
    Mine,
    /// Generate a new wallet address
    Address,
    /// Interactive dashboard (default)
    Dashboard,
}

pub async fn run(cmd: Commands, config: &ClientConfig) -> Result<()> {
    match cmd {
        Commands::Address => address::run(),
        Commands::Chain(args) => chain::run(args, connect(config)?).await,
        Commands::Balance(args) => balance::run(args, connect(config)?).await,
        Commands::History(args) => history::run(args, connect(config)?).await,
        Commands::Send(args) => send::run(args, connect(config)?).await,
        Commands::Mine => mine::run(connect(config)?).await,
        Commands::Dashboard => crate::repl::run(connect(config)?).await,
    }
}

fn connect(config: &ClientConfig) -> Result<Arc<HttpLedgerClient>> {
    let client = HttpLedgerClient::new(config)
        .with_context(|| format!("Failed to create client for {}", config.base_url))?;
    Ok(Arc::new(client))
}
