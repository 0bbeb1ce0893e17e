//! blockvision CLI entry point.

use blockvision_client::{ClientConfig, DEFAULT_NODE_URL};
use clap::Parser;
use std::time::Duration;

mod clipboard;
mod commands;
mod logging;
mod render;
mod repl;

#[derive(Parser)]
#[command(name = "blockvision")]
#[command(about = "Terminal dashboard for a blockvision ledger node", long_about = None)]
struct Cli {
    /// Base URL of the ledger node
    #[arg(long, global = true, env = "BLOCKVISION_NODE_URL", default_value = DEFAULT_NODE_URL)]
    node_url: String,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long, global = true, env = "BLOCKVISION_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, global = true, env = "BLOCKVISION_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<commands::Commands>,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.node_url.clone());
        match self.timeout {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let config = cli.client_config();
    let command = cli.command.unwrap_or(commands::Commands::Dashboard);

    if let Err(e) = commands::run(command, &config).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
