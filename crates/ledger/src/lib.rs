//! # Minipay Ledger
//!
//! Ledger engine layer - authentication, balance/history queries, and the
//! validated transfer operation on top of `minipay-store`.

pub mod engine;
pub mod error;
pub mod session;

pub use engine::{LedgerEngine, Receipt};
pub use error::{LedgerError, LedgerResult};
pub use session::{AuthGate, Session};
