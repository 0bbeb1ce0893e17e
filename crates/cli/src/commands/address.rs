//! Wallet address generation.

use anyhow::Result;
use blockvision_core::WalletAddress;
use colored::Colorize;

pub fn run() -> Result<()> {
    let address = WalletAddress::generate();
    println!("{}", address.as_str().bright_yellow());
    Ok(())
}
