//! Minipay CLI - ledger operations from command line
//!
//! Usage:
//! ```bash
//! minipay init
//! minipay balance 1001 --pin 1234
//! minipay history 1001 --pin 1234
//! minipay send 1001 --pin 1234 --to 1002 --amount 1000
//! minipay send 1001 --pin 1234 --qr "Account:1002" --amount 1000
//! minipay qr 1001
//! minipay accounts
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// Minipay - a minimal account ledger with PIN auth and QR payment addresses
#[derive(Parser)]
#[command(name = "minipay")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Record file path
    #[arg(long, default_value = "data/minipay.csv", global = true)]
    pub data: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the record file (seeds bootstrap accounts if absent)
    Init {
        /// Re-seed even if the record file already exists
        #[arg(long)]
        force: bool,
    },

    /// Show the balance of an account
    Balance {
        /// Account number
        account: u32,
        /// PIN
        #[arg(long)]
        pin: u32,
    },

    /// Show the transaction history of an account, oldest first
    History {
        /// Account number
        account: u32,
        /// PIN
        #[arg(long)]
        pin: u32,
    },

    /// Send money to another account
    Send {
        /// Sender account number
        account: u32,
        /// PIN
        #[arg(long)]
        pin: u32,
        /// Recipient account number
        #[arg(long, conflicts_with = "qr")]
        to: Option<u32>,
        /// Recipient QR payload (e.g. "Account:1002")
        #[arg(long)]
        qr: Option<String>,
        /// Amount to send
        #[arg(long)]
        amount: String,
    },

    /// Show the QR payment address of an account (public identifier, no PIN)
    Qr {
        /// Account number
        account: u32,
    },

    /// List all accounts
    Accounts,

    /// Create a new account
    Create {
        /// Display name
        #[arg(long, short)]
        name: String,
        /// PIN for the new account
        #[arg(long)]
        pin: u32,
        /// Opening balance
        #[arg(long, default_value = "0")]
        balance: String,
    },

    /// Rewrite the record file from in-memory state
    Persist,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => commands::init(&cli.data, force),
        Commands::Balance { account, pin } => commands::balance(&cli.data, account, pin),
        Commands::History { account, pin } => commands::history(&cli.data, account, pin),
        Commands::Send {
            account,
            pin,
            to,
            qr,
            amount,
        } => commands::send(&cli.data, account, pin, to, qr.as_deref(), &amount),
        Commands::Qr { account } => commands::qr(&cli.data, account),
        Commands::Accounts => commands::accounts(&cli.data),
        Commands::Create { name, pin, balance } => {
            commands::create(&cli.data, &name, pin, &balance)
        }
        Commands::Persist => commands::persist(&cli.data),
    }
}
