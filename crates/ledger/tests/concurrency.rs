//! Integration tests for concurrent transfers through the ledger engine
//!
//! The lost-update race: two transfers from the same account both read a
//! stale balance and both pass the funds check. The store's write lock must
//! make that impossible - total successful debits never exceed the opening
//! balance and the final balance is exact.

use std::sync::Arc;
use std::thread;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::tempdir;

use minipay_ledger::{LedgerEngine, LedgerError};
use minipay_store::AccountStore;

fn open_engine(dir: &tempfile::TempDir) -> Arc<LedgerEngine> {
    let store = Arc::new(AccountStore::open(dir.path().join("minipay.csv")).unwrap());
    Arc::new(LedgerEngine::new(store))
}

#[test]
fn concurrent_drain_from_one_account() {
    // Alice opens with 5000; 12 threads each try to send 1000.
    // Exactly 5 can succeed.
    let dir = tempdir().unwrap();
    let engine = open_engine(&dir);

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let session = engine.authenticate(1001, 1234).unwrap();
                engine.transfer(&session, 1002, dec!(1000))
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(receipt) => {
                assert_eq!(receipt.amount, dec!(1000));
                successes += 1;
            }
            Err(LedgerError::InsufficientFunds { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 5);

    let alice = engine.store().get(1001).unwrap();
    let bob = engine.store().get(1002).unwrap();
    assert_eq!(alice.balance, dec!(0));
    assert_eq!(bob.balance, dec!(8000));
    assert_eq!(alice.history.len(), 5);
    assert_eq!(bob.history.len(), 5);
}

#[test]
fn concurrent_crossing_transfers_conserve_total() {
    // Transfers targeting each other's accounts from many threads.
    // A single store-wide write lock means no deadlock and no lost update.
    let dir = tempdir().unwrap();
    let engine = open_engine(&dir);

    let total_before: Decimal = engine
        .store()
        .accounts()
        .iter()
        .map(|a| a.balance)
        .sum();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                if i % 2 == 0 {
                    let session = engine.authenticate(1001, 1234).unwrap();
                    engine.transfer(&session, 1002, dec!(100))
                } else {
                    let session = engine.authenticate(1002, 5678).unwrap();
                    engine.transfer(&session, 1001, dec!(100))
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let accounts = engine.store().accounts();
    let total_after: Decimal = accounts.iter().map(|a| a.balance).sum();
    assert_eq!(total_before, total_after);
    for account in &accounts {
        assert!(account.balance >= Decimal::ZERO);
    }

    // 4 sends each way cancel out
    assert_eq!(engine.store().get(1001).unwrap().balance, dec!(5000));
    assert_eq!(engine.store().get(1002).unwrap().balance, dec!(3000));
}

#[test]
fn concurrent_readers_never_see_partial_transfer() {
    // Readers snapshot both balances while transfers run; the sum must be
    // constant in every snapshot, or a half-applied transfer leaked out.
    let dir = tempdir().unwrap();
    let engine = open_engine(&dir);

    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            let session = engine.authenticate(1001, 1234).unwrap();
            for _ in 0..20 {
                engine.transfer(&session, 1002, dec!(10)).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..50 {
                    let total: Decimal = engine
                        .store()
                        .accounts()
                        .iter()
                        .map(|a| a.balance)
                        .sum();
                    assert_eq!(total, dec!(8000));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(engine.store().get(1001).unwrap().balance, dec!(4800));
    assert_eq!(engine.store().get(1002).unwrap().balance, dec!(3200));
}
