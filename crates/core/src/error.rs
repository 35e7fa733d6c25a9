//! # Error Module
//!
//! Định nghĩa các domain errors cho Minipay core sử dụng thiserror.

use thiserror::Error;

/// Core domain errors.
///
/// Các lỗi thuần túy về dữ liệu, không liên quan đến storage hay session.
#[derive(Debug, Error)]
pub enum CoreError {
    // === QR payload errors ===
    #[error("Invalid QR payload: {0}")]
    InvalidPayload(String),

    // === History entry errors ===
    #[error("Invalid transaction entry: {0}")]
    InvalidEntry(String),
}

/// Result type alias với CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Kiểm tra có phải lỗi payload không
    pub fn is_invalid_payload(&self) -> bool {
        matches!(self, CoreError::InvalidPayload(_))
    }
}
