//! Command handlers - open the store, run one engine operation, print

use anyhow::{bail, Result};
use minipay_core::qr as qr_payload;
use minipay_ledger::{AuthGate, LedgerEngine, Session};
use minipay_store::AccountStore;
use std::path::Path;
use std::sync::Arc;

fn open_engine(data: &Path) -> Result<LedgerEngine> {
    let store = Arc::new(AccountStore::open(data)?);
    Ok(LedgerEngine::new(store))
}

fn login(engine: &LedgerEngine, account: u32, pin: u32) -> Result<Session> {
    let gate = AuthGate::new(engine);
    Ok(gate.login(account, pin)?)
}

pub fn init(data: &Path, force: bool) -> Result<()> {
    if force && data.exists() {
        std::fs::remove_file(data)?;
    }
    let engine = open_engine(data)?;
    println!("Record file ready at {}", data.display());
    for account in engine.store().accounts() {
        println!("  {}", account);
    }
    Ok(())
}

pub fn balance(data: &Path, account: u32, pin: u32) -> Result<()> {
    let engine = open_engine(data)?;
    let session = login(&engine, account, pin)?;
    let name = engine.name_of(&session)?;
    let balance = engine.balance_of(&session)?;
    println!("{} ({}): balance {}", account, name, balance);
    Ok(())
}

pub fn history(data: &Path, account: u32, pin: u32) -> Result<()> {
    let engine = open_engine(data)?;
    let session = login(&engine, account, pin)?;
    let history = engine.history_of(&session)?;
    if history.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }
    for record in history {
        println!("{}", record);
    }
    Ok(())
}

pub fn send(
    data: &Path,
    account: u32,
    pin: u32,
    to: Option<u32>,
    qr: Option<&str>,
    amount: &str,
) -> Result<()> {
    let recipient = match (to, qr) {
        (Some(n), _) => n,
        (None, Some(payload)) => qr_payload::decode(payload)?,
        (None, None) => bail!("either --to or --qr is required"),
    };

    let amount = LedgerEngine::parse_amount(amount)?;

    let engine = open_engine(data)?;
    let session = login(&engine, account, pin)?;
    let receipt = engine.transfer(&session, recipient, amount)?;

    println!(
        "Sent {} to {} - new balance {}",
        receipt.amount, receipt.recipient, receipt.sender_balance
    );
    Ok(())
}

pub fn qr(data: &Path, account: u32) -> Result<()> {
    let engine = open_engine(data)?;
    println!("{}", engine.store().get(account)?.qr_payload);
    Ok(())
}

pub fn accounts(data: &Path) -> Result<()> {
    let engine = open_engine(data)?;
    for account in engine.store().accounts() {
        println!("{}", account);
    }
    Ok(())
}

pub fn create(data: &Path, name: &str, pin: u32, balance: &str) -> Result<()> {
    use rust_decimal::Decimal;
    use std::str::FromStr;

    let balance = Decimal::from_str(balance.trim())
        .map_err(|_| anyhow::anyhow!("invalid opening balance: {balance}"))?;

    let engine = open_engine(data)?;
    let account = engine.store().create_account(name, pin, balance)?;
    println!("Created {} - QR payload {}", account, account.qr_payload);
    Ok(())
}

pub fn persist(data: &Path) -> Result<()> {
    let engine = open_engine(data)?;
    engine.store().persist()?;
    println!("Record file rewritten at {}", data.display());
    Ok(())
}
