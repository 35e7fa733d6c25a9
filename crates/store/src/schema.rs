//! # Record file schema
//!
//! Row type cho CSV mapping - một dòng trên một account.
//!
//! Thứ tự và tên cột là compatibility contract với fixture gốc:
//! `Account Number, Name, Balance, PIN, Transactions, QR Code`.
//! Cột `Transactions` là danh sách entry text join bằng `", "`.

use crate::error::{StoreError, StoreResult};
use minipay_core::{Account, TransactionRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Separator giữa các entry trong cột `Transactions`
const ENTRY_SEPARATOR: &str = ", ";

/// Row type cho record file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRow {
    #[serde(rename = "Account Number")]
    pub account_number: u32,
    #[serde(rename = "Name")]
    pub name: String,
    /// Decimal lưu dạng TEXT
    #[serde(rename = "Balance")]
    pub balance: String,
    #[serde(rename = "PIN")]
    pub pin: u32,
    #[serde(rename = "Transactions")]
    pub transactions: String,
    #[serde(rename = "QR Code")]
    pub qr_payload: String,
}

impl AccountRow {
    /// Parse row thành Account.
    ///
    /// Mọi lỗi parse (balance, entry, số dư âm) trả về `StorageCorrupt`.
    pub fn into_account(self) -> StoreResult<Account> {
        let balance = Decimal::from_str(self.balance.trim()).map_err(|_| {
            StoreError::corrupt(format!(
                "account {}: invalid balance {:?}",
                self.account_number, self.balance
            ))
        })?;
        if balance < Decimal::ZERO {
            return Err(StoreError::corrupt(format!(
                "account {}: negative balance {}",
                self.account_number, balance
            )));
        }

        let mut history = Vec::new();
        if !self.transactions.trim().is_empty() {
            for entry in self.transactions.split(ENTRY_SEPARATOR) {
                let record = TransactionRecord::parse_entry(entry).map_err(|_| {
                    StoreError::corrupt(format!(
                        "account {}: invalid transaction entry {:?}",
                        self.account_number, entry
                    ))
                })?;
                history.push(record);
            }
        }

        Ok(Account {
            number: self.account_number,
            name: self.name,
            balance,
            pin: self.pin,
            history,
            qr_payload: self.qr_payload,
        })
    }
}

impl From<&Account> for AccountRow {
    fn from(account: &Account) -> Self {
        let transactions = account
            .history
            .iter()
            .map(TransactionRecord::to_entry)
            .collect::<Vec<_>>()
            .join(ENTRY_SEPARATOR);

        Self {
            account_number: account.number,
            name: account.name.clone(),
            balance: account.balance.to_string(),
            pin: account.pin,
            transactions,
            qr_payload: account.qr_payload.clone(),
        }
    }
}
