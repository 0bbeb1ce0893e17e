//! Interactive dashboard.

use crate::clipboard::SystemClipboard;
use crate::render;
use anyhow::{Context, Result};
use blockvision_client::LedgerApi;
use blockvision_sync::{CascadeReport, ClipboardProvider, Session};
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// One line of dashboard input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Chain,
    Balance,
    History,
    ShowWallet,
    SetWallet(String),
    ResetWallet,
    Sender(String),
    Receiver(String),
    Amount(String),
    Form,
    Send,
    Mine,
    Copy,
    Refresh,
    Status,
    Help,
    Quit,
    Empty,
}

fn parse(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word {
        "" => Input::Empty,
        "chain" => Input::Chain,
        "balance" => Input::Balance,
        "history" => Input::History,
        "wallet" => match rest {
            "" => Input::ShowWallet,
            "reset" => Input::ResetWallet,
            address => Input::SetWallet(address.to_string()),
        },
        "sender" => Input::Sender(rest.to_string()),
        "receiver" => Input::Receiver(rest.to_string()),
        "amount" => Input::Amount(rest.to_string()),
        "form" => Input::Form,
        "send" => Input::Send,
        "mine" => Input::Mine,
        "copy" => Input::Copy,
        "refresh" => Input::Refresh,
        "status" => Input::Status,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(format!("Unknown command: {other}. Type 'help' for commands.")),
    };
    Ok(input)
}

const HELP: &[(&str, &str)] = &[
    ("chain", "show the blockchain"),
    ("balance", "show the active wallet's balance"),
    ("history", "show the active wallet's transactions"),
    ("wallet [ADDR|reset]", "show, switch or restore the active wallet"),
    ("sender <addr>", "set the transfer sender"),
    ("receiver <addr>", "set the transfer receiver"),
    ("amount <n>", "set the transfer amount"),
    ("form", "show the transfer form"),
    ("send", "submit the transfer form"),
    ("mine", "mine a block"),
    ("copy", "copy the active wallet address"),
    ("refresh", "re-fetch chain and balance"),
    ("status", "show the latest status messages"),
    ("quit", "leave the dashboard"),
];

pub async fn run<A: LedgerApi>(api: Arc<A>) -> Result<()> {
    let session = Session::new(api);

    println!("{}", "blockvision dashboard".bold().cyan());
    println!("  Wallet: {}", session.wallet().active().as_str().bright_yellow());
    println!("  Type 'help' for commands.");

    report_failures(&session.start().await);
    print_summary(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".bright_black());
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match parse(&line) {
            Ok(Input::Quit) => break,
            Ok(input) => handle(&session, input).await,
            Err(message) => render::failure(&message),
        }
    }

    Ok(())
}

async fn handle<A: LedgerApi>(session: &Session<A>, input: Input) {
    match input {
        Input::Empty | Input::Quit => {}
        Input::Chain => render::print_blocks(session.snapshot().blocks(), None),
        Input::Balance => {
            println!();
            let wallet = session.wallet().active();
            render::print_balance_state(wallet.as_str(), &session.balance_state());
            println!();
        }
        Input::History => render::print_history(&session.wallet_history()),
        Input::ShowWallet => print_wallet(session),
        Input::SetWallet(address) => {
            let address = session.set_wallet(&address);
            render::success(&format!("Active wallet: {}", address));
        }
        Input::ResetWallet => {
            let address = session.reset_wallet();
            render::success(&format!("Active wallet: {}", address));
        }
        Input::Sender(value) => session.submission().set_sender(&value),
        Input::Receiver(value) => session.submission().set_receiver(&value),
        Input::Amount(value) => session.submission().set_amount(&value),
        Input::Form => print_form(session),
        Input::Send => {
            let ok = session.submit().await.is_ok();
            print_outcome(ok, session.submission().status());
        }
        Input::Mine => {
            println!("{}", blockvision_sync::mining::STATUS_MINING.bright_black());
            let ok = session.mine().await.is_ok();
            print_outcome(ok, session.mining().status());
        }
        Input::Copy => {
            let ok = copy_address(session, &SystemClipboard);
            print_outcome(ok, session.copy_feedback().message());
        }
        Input::Refresh => {
            report_failures(&session.refresh().await);
            print_summary(session);
        }
        Input::Status => print_status(session),
        Input::Help => {
            println!();
            for (command, description) in HELP {
                println!("  {:<22} {}", command.bright_cyan(), description);
            }
            println!();
        }
    }
}

/// Copy the active address without stalling the runtime while the copy
/// utility runs.
fn copy_address<A: LedgerApi, C: ClipboardProvider>(session: &Session<A>, clipboard: &C) -> bool {
    tokio::task::block_in_place(|| session.copy_address(clipboard).is_ok())
}

fn print_outcome(ok: bool, status: Option<String>) {
    let status = status.unwrap_or_default();
    if ok {
        render::success(&status);
    } else {
        render::failure(&status);
    }
}

fn report_failures(report: &CascadeReport) {
    if let Err(e) = &report.chain {
        render::failure(&format!("Could not load chain: {e}"));
    }
    if let Err(e) = &report.balance {
        render::failure(&format!("Could not load balance: {e}"));
    }
}

fn print_summary<A: LedgerApi>(session: &Session<A>) {
    let snapshot = session.snapshot();
    println!();
    println!("  Blocks:  {}", snapshot.len().to_string().bright_cyan());
    if let Some(tip) = snapshot.tip() {
        render::print_hash("Tip", &tip.hash);
    }
    let wallet = session.wallet().active();
    render::print_balance_state(wallet.as_str(), &session.balance_state());
    println!();
}

fn print_wallet<A: LedgerApi>(session: &Session<A>) {
    let wallet = session.wallet();
    println!();
    println!("  Active: {}", wallet.active().as_str().bright_yellow());
    if wallet.is_overridden() {
        println!("  Own:    {}", wallet.own_address().as_str().bright_black());
    }
    println!();
}

fn print_form<A: LedgerApi>(session: &Session<A>) {
    let form = session.submission().form();
    println!();
    println!("  Sender:   {}", form.sender.bright_yellow());
    println!("  Receiver: {}", form.receiver.bright_yellow());
    println!("  Amount:   {}", form.amount.bright_cyan());
    println!();
}

fn print_status<A: LedgerApi>(session: &Session<A>) {
    let lines = [
        ("Transfer", session.submission().status()),
        ("Mining", session.mining().status()),
        ("Clipboard", session.copy_feedback().message()),
    ];
    println!();
    for (label, status) in lines {
        let shown = status.unwrap_or_else(|| "-".to_string());
        println!("  {:<10} {}", format!("{label}:"), shown);
    }
    if session.ledger().is_loading() {
        println!("  {}", "Loading chain...".bright_black());
    }
    println!();
}
