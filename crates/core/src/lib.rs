//! # Minipay Core
//!
//! Core domain types cho Minipay - Account, TransactionRecord, QR payload.
//!
//! Crate này không phụ thuộc vào crate nào khác trong workspace:
//! chỉ chứa các kiểu nghiệp vụ thuần túy và logic encode/decode QR.

pub mod account;
pub mod error;
pub mod qr;
pub mod record;

pub use account::Account;
pub use error::{CoreError, CoreResult};
pub use record::{Direction, TransactionRecord};
