//! # Store Errors
//!
//! Error types cho persistence layer, wrapping csv và IO errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum StoreError {
    // === Lookup errors ===
    #[error("Account not found: {0}")]
    NotFound(u32),

    // === Invariant errors ===
    #[error("Insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    #[error("Cannot transfer to same account: {0}")]
    SameAccountTransfer(u32),

    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    // === Load errors ===
    /// Dữ liệu tồn tại nhưng không parse được theo schema.
    /// Fatal khi load - không bao giờ fallback về store rỗng.
    #[error("Storage corrupt: {0}")]
    StorageCorrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // === Persist errors ===
    /// Ghi xuống disk thất bại SAU khi in-memory đã commit.
    /// Store được đánh dấu dirty; caller phải retry `persist()`.
    #[error("Persistence failure after commit: {0}")]
    PersistenceFailure(String),
}

/// Result type alias cho StoreError
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Tạo StorageCorrupt error
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::StorageCorrupt(reason.into())
    }

    /// Kiểm tra có phải lỗi not found không
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Kiểm tra có phải persistence failure không
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, Self::PersistenceFailure(_))
    }
}
