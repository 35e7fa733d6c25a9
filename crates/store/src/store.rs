//! # AccountStore
//!
//! Bảng account in-memory + persistence xuống record file CSV.
//!
//! Store sở hữu độc quyền mọi Account; mutation duy nhất đi qua
//! `apply_transfer` / `create_account`, cả hai giữ write lock cho trọn
//! chuỗi read-validate-write-persist. Reader nhận snapshot (clone) dưới
//! read lock nên không bao giờ thấy transfer áp dụng nửa chừng.

use crate::error::{StoreError, StoreResult};
use crate::schema::AccountRow;
use chrono::Utc;
use minipay_core::{Account, TransactionRecord};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, error, info};

/// Số tài khoản đầu tiên khi store còn rỗng
const FIRST_ACCOUNT_NUMBER: u32 = 1001;

#[derive(Debug)]
struct Inner {
    accounts: BTreeMap<u32, Account>,
    /// true khi in-memory đã commit nhưng persist thất bại
    dirty: bool,
}

/// Kết quả một transfer đã commit, chụp dưới cùng write lock.
#[derive(Debug, Clone)]
pub struct CommittedTransfer {
    /// Record đã append vào history của sender
    pub sent: TransactionRecord,
    /// Record đã append vào history của recipient
    pub received: TransactionRecord,
    /// Số dư sender sau commit
    pub sender_balance: Decimal,
    /// Số dư recipient sau commit
    pub recipient_balance: Decimal,
}

/// Account table với durable persistence.
#[derive(Debug)]
pub struct AccountStore {
    path: PathBuf,
    inner: RwLock<Inner>,
}

impl AccountStore {
    /// Mở store từ record file.
    ///
    /// File chưa tồn tại: seed bootstrap fixture (1001/Alice/5000,
    /// 1002/Bob/3000) và persist ngay. File tồn tại nhưng không parse
    /// được: `StorageCorrupt` - không bao giờ fallback về store rỗng.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let accounts = if path.exists() {
            let accounts = Self::load_rows(&path)?;
            info!(path = %path.display(), count = accounts.len(), "loaded account store");
            accounts
        } else {
            let accounts = Self::bootstrap();
            info!(path = %path.display(), "no record file, seeding bootstrap accounts");
            let store = Self {
                path: path.clone(),
                inner: RwLock::new(Inner {
                    accounts,
                    dirty: false,
                }),
            };
            store.persist()?;
            return Ok(store);
        };

        Ok(Self {
            path,
            inner: RwLock::new(Inner {
                accounts,
                dirty: false,
            }),
        })
    }

    /// Bootstrap fixture - chỉ dùng khi chưa có dữ liệu persisted
    fn bootstrap() -> BTreeMap<u32, Account> {
        let mut accounts = BTreeMap::new();
        accounts.insert(1001, Account::new(1001, "Alice", 1234, Decimal::from(5000)));
        accounts.insert(1002, Account::new(1002, "Bob", 5678, Decimal::from(3000)));
        accounts
    }

    fn load_rows(path: &Path) -> StoreResult<BTreeMap<u32, Account>> {
        let file = fs::File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);

        let mut accounts = BTreeMap::new();
        for result in reader.deserialize::<AccountRow>() {
            let row = result
                .map_err(|e| StoreError::corrupt(format!("unreadable row: {}", e)))?;
            let number = row.account_number;
            let account = row.into_account()?;
            if accounts.insert(number, account).is_some() {
                return Err(StoreError::corrupt(format!(
                    "duplicate account number: {}",
                    number
                )));
            }
        }
        Ok(accounts)
    }

    /// Đường dẫn record file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot một account theo số tài khoản
    pub fn get(&self, number: u32) -> StoreResult<Account> {
        let inner = self.inner.read().expect("account store lock poisoned");
        inner
            .accounts
            .get(&number)
            .cloned()
            .ok_or(StoreError::NotFound(number))
    }

    /// Snapshot toàn bộ accounts, tăng dần theo số tài khoản
    pub fn accounts(&self) -> Vec<Account> {
        let inner = self.inner.read().expect("account store lock poisoned");
        inner.accounts.values().cloned().collect()
    }

    /// true khi in-memory và disk đã diverge (persist thất bại sau commit)
    pub fn dirty(&self) -> bool {
        let inner = self.inner.read().expect("account store lock poisoned");
        inner.dirty
    }

    /// Tạo account mới với số tài khoản kế tiếp, persist ngay.
    pub fn create_account(
        &self,
        name: &str,
        pin: u32,
        opening_balance: Decimal,
    ) -> StoreResult<Account> {
        if opening_balance < Decimal::ZERO {
            return Err(StoreError::InvalidAmount(opening_balance));
        }

        let mut inner = self.inner.write().expect("account store lock poisoned");
        let number = inner
            .accounts
            .keys()
            .next_back()
            .map(|n| n + 1)
            .unwrap_or(FIRST_ACCOUNT_NUMBER);

        let account = Account::new(number, name, pin, opening_balance);
        inner.accounts.insert(number, account.clone());

        if let Err(e) = self.persist_locked(&inner) {
            inner.dirty = true;
            error!(number, "persist failed after account creation: {}", e);
            return Err(StoreError::PersistenceFailure(e.to_string()));
        }

        info!(number, name, "account created");
        Ok(account)
    }

    /// Điểm mutation duy nhất cho transfer: debit sender, credit recipient,
    /// append hai history records, persist - tất cả dưới một write lock.
    ///
    /// Reader chỉ thấy trạng thái trước hoặc sau trọn vẹn, không bao giờ
    /// thấy nửa chừng. Persist thất bại sau khi in-memory đã commit trả
    /// về `PersistenceFailure` và đánh dấu store dirty.
    pub fn apply_transfer(
        &self,
        from: u32,
        to: u32,
        amount: Decimal,
    ) -> StoreResult<CommittedTransfer> {
        if amount <= Decimal::ZERO {
            return Err(StoreError::InvalidAmount(amount));
        }
        if from == to {
            return Err(StoreError::SameAccountTransfer(from));
        }

        let mut inner = self.inner.write().expect("account store lock poisoned");

        // Validate dưới lock - snapshot check ở layer trên có thể đã stale
        if !inner.accounts.contains_key(&from) {
            return Err(StoreError::NotFound(from));
        }
        if !inner.accounts.contains_key(&to) {
            return Err(StoreError::NotFound(to));
        }

        let timestamp = Utc::now();
        let sent = TransactionRecord::sent(amount, to, timestamp);
        let received = TransactionRecord::received(amount, from, timestamp);

        let sender_balance = {
            let sender = inner.accounts.get_mut(&from).expect("checked above");
            if let Err(shortfall) = sender.debit(amount) {
                debug!(from, to, %amount, %shortfall, "transfer rejected: insufficient balance");
                return Err(StoreError::InsufficientBalance {
                    needed: amount,
                    available: amount - shortfall,
                });
            }
            sender.record(sent.clone());
            sender.balance
        };
        let recipient_balance = {
            let recipient = inner.accounts.get_mut(&to).expect("checked above");
            recipient.credit(amount);
            recipient.record(received.clone());
            recipient.balance
        };

        if let Err(e) = self.persist_locked(&inner) {
            inner.dirty = true;
            error!(from, to, %amount, "persist failed after committed transfer: {}", e);
            return Err(StoreError::PersistenceFailure(e.to_string()));
        }

        info!(from, to, %amount, "transfer committed");
        Ok(CommittedTransfer {
            sent,
            received,
            sender_balance,
            recipient_balance,
        })
    }

    /// Ghi toàn bộ bảng xuống disk, xóa cờ dirty.
    ///
    /// Public để caller retry sau một `PersistenceFailure`.
    pub fn persist(&self) -> StoreResult<()> {
        let mut inner = self.inner.write().expect("account store lock poisoned");
        self.persist_locked(&inner)?;
        inner.dirty = false;
        Ok(())
    }

    /// Full-table write: temp file + rename để row cũ không bị mất
    /// khi ghi dở chừng.
    fn persist_locked(&self, inner: &Inner) -> StoreResult<()> {
        let tmp = self.path.with_extension("csv.tmp");

        let mut writer = csv::Writer::from_path(&tmp)?;
        for account in inner.accounts.values() {
            writer.serialize(AccountRow::from(account))?;
        }
        writer.flush()?;
        drop(writer);

        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
