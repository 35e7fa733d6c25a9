//! LedgerEngine - the request/response core behind the presentation layer
//!
//! Validates and executes balance/history queries and transfers against an
//! AccountStore handle. The engine never holds a private copy of balances or
//! histories; every read goes through the store so results are always
//! current, and the atomic commit lives in `AccountStore::apply_transfer`.

use crate::error::{LedgerError, LedgerResult};
use crate::session::Session;
use chrono::{DateTime, Utc};
use minipay_core::TransactionRecord;
use minipay_store::{AccountStore, StoreError};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// Receipt returned for a committed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub amount: Decimal,
    pub recipient: u32,
    /// Sender balance after the commit
    pub sender_balance: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Ledger engine bound to one AccountStore.
pub struct LedgerEngine {
    store: Arc<AccountStore>,
}

impl LedgerEngine {
    pub fn new(store: Arc<AccountStore>) -> Self {
        Self { store }
    }

    /// The underlying store handle
    pub fn store(&self) -> &Arc<AccountStore> {
        &self.store
    }

    /// Parse a raw amount string into a positive Decimal.
    ///
    /// The presentation layer hands amounts through as text; a string that
    /// does not parse, or parses non-positive, is `InvalidAmount`.
    pub fn parse_amount(raw: &str) -> LedgerResult<Decimal> {
        let amount =
            Decimal::from_str(raw.trim()).map_err(|_| LedgerError::invalid_amount(raw))?;
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(raw));
        }
        Ok(amount)
    }

    /// Verify an account-number/PIN pair and issue a session.
    ///
    /// The pair is checked as a whole: an unknown account number and a wrong
    /// PIN both come back as `InvalidCredentials`, nothing more specific.
    pub fn authenticate(&self, account_number: u32, pin: u32) -> LedgerResult<Session> {
        match self.store.get(account_number) {
            Ok(account) if account.pin_matches(pin) => {
                info!(account_number, "authenticated");
                Ok(Session::new(account_number))
            }
            _ => {
                debug!(account_number, "authentication rejected");
                Err(LedgerError::InvalidCredentials)
            }
        }
    }

    /// Current balance of the session's own account
    pub fn balance_of(&self, session: &Session) -> LedgerResult<Decimal> {
        let account = self.store.get(session.account_number())?;
        Ok(account.balance)
    }

    /// Transaction history of the session's own account, oldest first
    pub fn history_of(&self, session: &Session) -> LedgerResult<Vec<TransactionRecord>> {
        let account = self.store.get(session.account_number())?;
        Ok(account.history)
    }

    /// Display name of the session's own account
    pub fn name_of(&self, session: &Session) -> LedgerResult<String> {
        let account = self.store.get(session.account_number())?;
        Ok(account.name)
    }

    /// QR payload of the session's own account
    pub fn qr_payload_of(&self, session: &Session) -> LedgerResult<String> {
        let account = self.store.get(session.account_number())?;
        Ok(account.qr_payload)
    }

    /// Transfer `amount` from the session's account to `to`.
    ///
    /// Validation order is fixed, first failure wins:
    /// 1. amount must be positive          -> InvalidAmount
    /// 2. recipient must exist             -> UnknownRecipient
    /// 3. recipient must not be the sender -> InvalidRecipient
    /// 4. amount must not exceed balance   -> InsufficientFunds
    ///
    /// On success the store commits both balance updates and both history
    /// appends atomically and persists before the receipt is returned.
    /// Every rejection leaves both accounts untouched.
    pub fn transfer(&self, session: &Session, to: u32, amount: Decimal) -> LedgerResult<Receipt> {
        let from = session.account_number();

        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount.to_string()));
        }
        if let Err(e) = self.store.get(to) {
            return match e {
                StoreError::NotFound(_) => Err(LedgerError::UnknownRecipient(to)),
                other => Err(other.into()),
            };
        }
        if to == from {
            return Err(LedgerError::InvalidRecipient(to));
        }

        // Funds are re-checked under the store's write lock; the snapshot
        // taken here could go stale between validation and commit.
        let committed = self.store.apply_transfer(from, to, amount).map_err(|e| match e {
            StoreError::InsufficientBalance { needed, available } => {
                LedgerError::InsufficientFunds {
                    required: needed,
                    available,
                }
            }
            StoreError::NotFound(n) if n == to => LedgerError::UnknownRecipient(to),
            StoreError::SameAccountTransfer(n) => LedgerError::InvalidRecipient(n),
            other => LedgerError::Store(other),
        })?;

        Ok(Receipt {
            amount,
            recipient: to,
            sender_balance: committed.sender_balance,
            timestamp: committed.sent.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minipay_core::Direction;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn engine(dir: &tempfile::TempDir) -> LedgerEngine {
        let store = Arc::new(AccountStore::open(dir.path().join("minipay.csv")).unwrap());
        LedgerEngine::new(store)
    }

    #[test]
    fn test_authenticate() {
        let dir = tempdir().unwrap();
        let engine = engine(&dir);

        let session = engine.authenticate(1001, 1234).unwrap();
        assert_eq!(session.account_number(), 1001);

        // Wrong PIN and unknown account look identical
        assert!(matches!(
            engine.authenticate(1001, 5678).unwrap_err(),
            LedgerError::InvalidCredentials
        ));
        assert!(matches!(
            engine.authenticate(9999, 1234).unwrap_err(),
            LedgerError::InvalidCredentials
        ));
    }

    #[test]
    fn test_balance_and_name() {
        let dir = tempdir().unwrap();
        let engine = engine(&dir);
        let session = engine.authenticate(1002, 5678).unwrap();

        assert_eq!(engine.balance_of(&session).unwrap(), dec!(3000));
        assert_eq!(engine.name_of(&session).unwrap(), "Bob");
        assert_eq!(engine.qr_payload_of(&session).unwrap(), "Account:1002");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(LedgerEngine::parse_amount("100").unwrap(), dec!(100));
        assert_eq!(LedgerEngine::parse_amount(" 42.50 ").unwrap(), dec!(42.50));

        for raw in ["abc", "", "0", "-10", "1e", "10 USD"] {
            assert!(matches!(
                LedgerEngine::parse_amount(raw).unwrap_err(),
                LedgerError::InvalidAmount(_)
            ));
        }
    }

    #[test]
    fn test_transfer_scenario() {
        // Bootstrap: 1001/Alice/5000, 1002/Bob/3000
        let dir = tempdir().unwrap();
        let engine = engine(&dir);
        let session = engine.authenticate(1001, 1234).unwrap();

        let receipt = engine.transfer(&session, 1002, dec!(1000)).unwrap();
        assert_eq!(receipt.amount, dec!(1000));
        assert_eq!(receipt.recipient, 1002);
        assert_eq!(receipt.sender_balance, dec!(4000));

        let bob_session = engine.authenticate(1002, 5678).unwrap();
        assert_eq!(engine.balance_of(&bob_session).unwrap(), dec!(4000));

        let alice_history = engine.history_of(&session).unwrap();
        assert_eq!(alice_history.len(), 1);
        assert_eq!(alice_history[0].direction, Direction::Sent);
        assert_eq!(alice_history[0].amount, dec!(1000));
        assert_eq!(alice_history[0].counterparty, 1002);

        let bob_history = engine.history_of(&bob_session).unwrap();
        assert_eq!(bob_history.len(), 1);
        assert_eq!(bob_history[0].direction, Direction::Received);
        assert_eq!(bob_history[0].counterparty, 1001);

        // Follow-up over-balance transfer fails and changes nothing
        let err = engine.transfer(&session, 1002, dec!(10000)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        assert_eq!(engine.balance_of(&session).unwrap(), dec!(4000));
        assert_eq!(engine.balance_of(&bob_session).unwrap(), dec!(4000));
    }

    #[test]
    fn test_transfer_validation_order() {
        let dir = tempdir().unwrap();
        let engine = engine(&dir);
        let session = engine.authenticate(1001, 1234).unwrap();

        // 1. Non-positive amount wins over everything else
        assert!(matches!(
            engine.transfer(&session, 9999, dec!(0)).unwrap_err(),
            LedgerError::InvalidAmount(_)
        ));

        // 2. Unknown recipient beats the self-transfer and funds checks
        assert!(matches!(
            engine.transfer(&session, 9999, dec!(10000)).unwrap_err(),
            LedgerError::UnknownRecipient(9999)
        ));

        // 3. Self-transfer is rejected even with sufficient funds
        assert!(matches!(
            engine.transfer(&session, 1001, dec!(10)).unwrap_err(),
            LedgerError::InvalidRecipient(1001)
        ));

        // 4. Insufficient funds comes last
        assert!(matches!(
            engine.transfer(&session, 1002, dec!(5000.01)).unwrap_err(),
            LedgerError::InsufficientFunds { .. }
        ));

        // All rejections were no-ops
        assert_eq!(engine.balance_of(&session).unwrap(), dec!(5000));
        assert!(engine.history_of(&session).unwrap().is_empty());
    }

    #[test]
    fn test_conservation() {
        let dir = tempdir().unwrap();
        let engine = engine(&dir);
        let alice = engine.authenticate(1001, 1234).unwrap();
        let bob = engine.authenticate(1002, 5678).unwrap();

        let before =
            engine.balance_of(&alice).unwrap() + engine.balance_of(&bob).unwrap();

        engine.transfer(&alice, 1002, dec!(777.77)).unwrap();
        engine.transfer(&bob, 1001, dec!(123.45)).unwrap();

        let after =
            engine.balance_of(&alice).unwrap() + engine.balance_of(&bob).unwrap();
        assert_eq!(before, after);
    }
}
