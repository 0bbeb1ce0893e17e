//! Terminal rendering of ledger state.

use blockvision_core::{truncate_hash, Block, Direction, HistoryEntry};
use blockvision_sync::{BalanceState, WalletHistory};
use colored::Colorize;

pub fn print_blocks(blocks: &[Block], count: Option<usize>) {
    println!();
    println!("{}", "Blockchain:".bold().cyan());
    println!();

    if blocks.is_empty() {
        println!("  {}", "No blocks found.".bright_black());
        println!();
        return;
    }

    let skip = count.map_or(0, |count| blocks.len().saturating_sub(count));
    for block in blocks.iter().skip(skip).rev() {
        print_block(block);
    }
}

fn print_block(block: &Block) {
    let time = block
        .datetime()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| block.timestamp.to_string());

    println!(
        "  {} {} {}",
        format!("#{}", block.index).bright_black(),
        block.short_hash().bright_yellow(),
        format!("({} txs)", block.tx_count()).bright_black()
    );
    println!("    Previous:  {}", block.short_previous_hash().bright_black());
    println!("    Timestamp: {}", time.bright_black());
    println!("    Nonce:     {}", block.nonce.to_string().bright_cyan());

    for (i, tx) in block.transactions.iter().enumerate() {
        println!(
            "    {} {} -> {}: {}",
            format!("{}.", i + 1).bright_black(),
            tx.sender.bright_yellow(),
            tx.receiver.bright_yellow(),
            tx.amount.to_string().bright_cyan()
        );
    }
    println!();
}

pub fn print_balance(address: &str, balance: Option<f64>) {
    let shown = match balance {
        Some(value) => value.to_string().bright_cyan(),
        None => "unavailable".bright_black(),
    };
    println!("  Wallet:  {}", address.bright_yellow());
    println!("  Balance: {}", shown);
}

pub fn print_balance_state(address: &str, state: &BalanceState) {
    print_balance(address, state.value);
    if state.loading {
        println!("  {}", "(updating...)".bright_black());
    }
}

pub fn print_history(history: &WalletHistory) {
    println!();
    println!(
        "{} {}",
        "Transaction history for".bold().cyan(),
        history.address.as_str().bright_yellow()
    );
    println!();

    if history.entries.is_empty() {
        println!("  {}", "No transactions yet.".bright_black());
    }
    for entry in history.entries.iter() {
        print_entry(entry);
    }
    println!();
}

fn print_entry(entry: &HistoryEntry) {
    let direction = match entry.direction {
        Direction::Sent => "Sent".red().bold(),
        Direction::Received => "Received".green().bold(),
    };
    let preposition = match entry.direction {
        Direction::Sent => "to",
        Direction::Received => "from",
    };
    println!(
        "  {} {} {} coins {} {}",
        format!("[block {}]", entry.block_index).bright_black(),
        direction,
        entry.amount().to_string().bright_cyan(),
        preposition,
        entry.counterparty().bright_yellow()
    );
}

pub fn print_hash(label: &str, hash: &str) {
    println!("  {label}: {}", truncate_hash(hash).bright_yellow());
}

pub fn success(message: &str) {
    println!("{}  {}", "✓".green().bold(), message);
}

pub fn failure(message: &str) {
    println!("{}  {}", "✗".red().bold(), message);
}
