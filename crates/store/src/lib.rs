//! # Minipay Store
//!
//! Persistence layer cho Minipay - in-memory account table + CSV record file.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   AccountStore                      │
//! │  ┌──────────────┐        ┌───────────────────────┐  │
//! │  │  RwLock map  │ ─────▶ │  CSV record file      │  │
//! │  │  (state)     │ persist│  (durable, full-table)│  │
//! │  └──────────────┘        └───────────────────────┘  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use minipay_store::AccountStore;
//!
//! // Mở store (seed bootstrap nếu file chưa có)
//! let store = AccountStore::open("data/minipay.csv")?;
//!
//! // Snapshot reads
//! let alice = store.get(1001)?;
//!
//! // Mutation duy nhất: atomic + persist
//! let committed = store.apply_transfer(1001, 1002, amount)?;
//! ```

pub mod error;
pub mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use schema::AccountRow;
pub use store::{AccountStore, CommittedTransfer};
