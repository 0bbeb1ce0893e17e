//! Chain listing command.

use crate::render;
use anyhow::{Context, Result};
use blockvision_client::LedgerApi;
use blockvision_core::LedgerSnapshot;
use clap::Args;
use std::sync::Arc;

#[derive(Args)]
pub struct ChainArgs {
    /// Number of most recent blocks to show (all when omitted)
    #[arg(short, long)]
    count: Option<usize>,
}

pub async fn run<A: LedgerApi>(args: ChainArgs, api: Arc<A>) -> Result<()> {
    let blocks = api
        .fetch_chain()
        .await
        .context("Failed to fetch chain")?;
    let snapshot = LedgerSnapshot::new(blocks);

    render::print_blocks(snapshot.blocks(), args.count);
    if let Some(tip) = snapshot.tip() {
        render::print_hash("Tip", &tip.hash);
        println!();
    }
    Ok(())
}
