//! # Account Module
//!
//! Định nghĩa Account - tài khoản trong ledger.
//!
//! Invariants:
//! - `balance >= 0` tại mọi thời điểm
//! - `number` là unique trong store và immutable
//! - `history` là append-only, thứ tự insert = thứ tự thời gian

use crate::qr;
use crate::record::TransactionRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tài khoản trong ledger.
///
/// Account được sở hữu độc quyền bởi AccountStore; các layer khác chỉ
/// nhận snapshot (clone) qua interface của store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Số tài khoản (1001, 1002, ...)
    pub number: u32,
    /// Tên hiển thị
    pub name: String,
    /// Số dư hiện tại, không bao giờ âm
    pub balance: Decimal,
    /// Mã PIN (shared secret, so sánh nguyên cặp - xem LedgerEngine)
    pub pin: u32,
    /// Lịch sử giao dịch, cũ nhất trước
    pub history: Vec<TransactionRecord>,
    /// QR payload, sinh một lần khi tạo account
    pub qr_payload: String,
}

impl Account {
    /// Tạo Account mới với history rỗng và QR payload sinh sẵn
    pub fn new(number: u32, name: &str, pin: u32, balance: Decimal) -> Self {
        Self {
            number,
            name: name.to_string(),
            balance,
            pin,
            history: Vec::new(),
            qr_payload: qr::encode(number),
        }
    }

    /// Kiểm tra có đủ số dư để gửi `amount` không
    pub fn can_spend(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }

    /// Cộng tiền vào số dư
    pub fn credit(&mut self, amount: Decimal) {
        self.balance += amount;
    }

    /// Trừ tiền khỏi số dư
    ///
    /// # Returns
    /// - `Ok(())` nếu thành công
    /// - `Err(shortfall)` nếu không đủ số dư (số dư không bị thay đổi)
    pub fn debit(&mut self, amount: Decimal) -> Result<(), Decimal> {
        if self.balance >= amount {
            self.balance -= amount;
            Ok(())
        } else {
            Err(amount - self.balance)
        }
    }

    /// Append một record vào lịch sử
    pub fn record(&mut self, record: TransactionRecord) {
        self.history.push(record);
    }

    /// Kiểm tra PIN khớp nguyên cặp (number + pin)
    pub fn pin_matches(&self, pin: u32) -> bool {
        self.pin == pin
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account {} ({}, balance: {}, transactions: {})",
            self.number,
            self.name,
            self.balance,
            self.history.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_creation() {
        let account = Account::new(1001, "Alice", 1234, dec!(5000));

        assert_eq!(account.number, 1001);
        assert_eq!(account.name, "Alice");
        assert_eq!(account.balance, dec!(5000));
        assert!(account.history.is_empty());
        assert_eq!(account.qr_payload, "Account:1001");
    }

    #[test]
    fn test_credit_debit() {
        let mut account = Account::new(1001, "Alice", 1234, dec!(100));

        account.credit(dec!(50));
        assert_eq!(account.balance, dec!(150));

        assert!(account.debit(dec!(150)).is_ok());
        assert_eq!(account.balance, dec!(0));

        // Debit quá số dư: trả về shortfall, số dư giữ nguyên
        let err = account.debit(dec!(30)).unwrap_err();
        assert_eq!(err, dec!(30));
        assert_eq!(account.balance, dec!(0));
    }

    #[test]
    fn test_can_spend() {
        let account = Account::new(1001, "Alice", 1234, dec!(100));
        assert!(account.can_spend(dec!(100)));
        assert!(!account.can_spend(dec!(100.01)));
    }

    #[test]
    fn test_history_append_order() {
        let mut account = Account::new(1001, "Alice", 1234, dec!(100));
        let ts = Utc::now();

        account.record(TransactionRecord::sent(dec!(10), 1002, ts));
        account.record(TransactionRecord::received(dec!(20), 1003, ts));

        assert_eq!(account.history.len(), 2);
        assert_eq!(account.history[0].counterparty, 1002);
        assert_eq!(account.history[1].counterparty, 1003);
    }

    #[test]
    fn test_pin_matches() {
        let account = Account::new(1001, "Alice", 1234, dec!(100));
        assert!(account.pin_matches(1234));
        assert!(!account.pin_matches(5678));
    }
}
