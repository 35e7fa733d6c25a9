//! # Record Module
//!
//! Định nghĩa Direction và TransactionRecord - một dòng trong lịch sử
//! giao dịch của Account. Record là immutable sau khi được append.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chiều của giao dịch nhìn từ phía chủ tài khoản.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Tiền gửi đi
    Sent,
    /// Tiền nhận về
    Received,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Sent => "Sent",
            Direction::Received => "Received",
        }
    }

    /// Giới từ dùng trong entry text ("to" cho Sent, "from" cho Received)
    fn preposition(&self) -> &'static str {
        match self {
            Direction::Sent => "to",
            Direction::Received => "from",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Một giao dịch đã commit trong lịch sử của Account.
///
/// - `direction`: Sent hoặc Received
/// - `amount`: luôn dương
/// - `counterparty`: số tài khoản đối tác
/// - `timestamp`: thời điểm commit (UTC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub direction: Direction,
    pub amount: Decimal,
    pub counterparty: u32,
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    /// Tạo record chiều gửi đi
    pub fn sent(amount: Decimal, to: u32, timestamp: DateTime<Utc>) -> Self {
        Self {
            direction: Direction::Sent,
            amount,
            counterparty: to,
            timestamp,
        }
    }

    /// Tạo record chiều nhận về
    pub fn received(amount: Decimal, from: u32, timestamp: DateTime<Utc>) -> Self {
        Self {
            direction: Direction::Received,
            amount,
            counterparty: from,
            timestamp,
        }
    }

    /// Serialize thành entry text cho cột `Transactions` trong file.
    ///
    /// Format: `Sent 100 to 1002 at 2026-08-30T10:00:00Z`
    ///         `Received 100 from 1001 at 2026-08-30T10:00:00Z`
    pub fn to_entry(&self) -> String {
        format!(
            "{} {} {} {} at {}",
            self.direction,
            self.amount,
            self.direction.preposition(),
            self.counterparty,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }

    /// Parse một entry text thành record.
    ///
    /// Entry không đúng format trả về `CoreError::InvalidEntry`.
    pub fn parse_entry(entry: &str) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidEntry(entry.to_string());

        let parts: Vec<&str> = entry.split_whitespace().collect();
        if parts.len() != 6 || parts[4] != "at" {
            return Err(invalid());
        }

        let direction = match (parts[0], parts[2]) {
            ("Sent", "to") => Direction::Sent,
            ("Received", "from") => Direction::Received,
            _ => return Err(invalid()),
        };

        let amount = Decimal::from_str(parts[1]).map_err(|_| invalid())?;
        if amount <= Decimal::ZERO {
            return Err(invalid());
        }
        let counterparty: u32 = parts[3].parse().map_err(|_| invalid())?;
        let timestamp = DateTime::parse_from_rfc3339(parts[5])
            .map_err(|_| invalid())?
            .with_timezone(&Utc);

        Ok(Self {
            direction,
            amount,
            counterparty,
            timestamp,
        })
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_entry())
    }
}
