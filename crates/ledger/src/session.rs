//! Session handles and the AuthGate that issues them
//!
//! A Session carries only the authenticated account number. It confers no
//! trust beyond identifying the account for subsequent operations, and
//! logout simply discards the handle.

use crate::engine::LedgerEngine;
use crate::error::LedgerResult;
use std::fmt;

/// Handle for an authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    account_number: u32,
}

impl Session {
    pub(crate) fn new(account_number: u32) -> Self {
        Self { account_number }
    }

    /// The authenticated account number
    pub fn account_number(&self) -> u32 {
        self.account_number
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session for account {}", self.account_number)
    }
}

/// AuthGate - issues and discards Session handles.
///
/// Thin wrapper over `LedgerEngine::authenticate`; there is no server-side
/// revocation state to clean up on logout.
pub struct AuthGate<'a> {
    engine: &'a LedgerEngine,
}

impl<'a> AuthGate<'a> {
    pub fn new(engine: &'a LedgerEngine) -> Self {
        Self { engine }
    }

    /// Verify credentials and issue a session
    pub fn login(&self, account_number: u32, pin: u32) -> LedgerResult<Session> {
        self.engine.authenticate(account_number, pin)
    }

    /// Discard a session; there is nothing to revoke server-side
    pub fn logout(&self, session: Session) {
        let _ = session;
    }
}
