//! Ledger layer errors
//!
//! Typed errors so callers can match on the exact rejection reason.

use minipay_store::StoreError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Ledger operation errors
#[derive(Debug, Error)]
pub enum LedgerError {
    // === Authentication errors ===
    /// Full-pair check: a wrong PIN and an unknown account number are
    /// indistinguishable to the caller.
    #[error("Invalid account number or PIN")]
    InvalidCredentials,

    // === Transfer validation errors (no mutation performed) ===
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown recipient account: {0}")]
    UnknownRecipient(u32),

    #[error("Invalid recipient: cannot transfer to own account {0}")]
    InvalidRecipient(u32),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    // === Wrapped errors ===
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    /// Create invalid amount error
    pub fn invalid_amount(raw: &str) -> Self {
        Self::InvalidAmount(raw.to_string())
    }

    /// Check whether this is a recoverable validation rejection
    /// (as opposed to a storage-level failure)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::UnknownRecipient(_)
                | Self::InvalidRecipient(_)
                | Self::InsufficientFunds { .. }
        )
    }
}
