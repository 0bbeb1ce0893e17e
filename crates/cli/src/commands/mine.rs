//! Block mining command.

use crate::render;
use anyhow::Result;
use blockvision_client::LedgerApi;
use blockvision_sync::Session;
use colored::Colorize;
use std::sync::Arc;

pub async fn run<A: LedgerApi>(api: Arc<A>) -> Result<()> {
    let session = Session::without_wallet(api);
    println!("{}", blockvision_sync::mining::STATUS_MINING.bold().cyan());

    let outcome = session.mine().await;
    let status = session.mining().status().unwrap_or_default();
    match outcome {
        Ok(receipt) => {
            render::success(&status);
            if let Some(tip) = session.snapshot().tip() {
                render::print_hash("New tip", &tip.hash);
            }
            if let Err(e) = receipt.cascade.chain {
                tracing::warn!(error = %e, "chain refresh after mining failed");
            }
            Ok(())
        }
        Err(e) => {
            render::failure(&status);
            Err(e.into())
        }
    }
}
