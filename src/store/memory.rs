//! In-memory store double for engine tests
//!
//! Implements every store trait over a shared map so the full transfer
//! flow runs without PostgreSQL. Semantics mirror the real store:
//!
//! - `locked_balance` takes a per-account async lock held until the
//!   unit of work is consumed, emulating `FOR UPDATE` row locking.
//! - Writes stage inside the unit of work and become visible only on
//!   commit; idempotency-key uniqueness is re-checked at commit so a
//!   same-key race loses with `DuplicateKey` exactly like the unique
//!   index.
//! - Entry IDs are drawn from a sequence at append time and burned on
//!   rollback, like BIGSERIAL.
//! - There is no way to modify or delete a committed entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use crate::account::{Account, AccountRegistry, AccountStatus};
use crate::core_types::{AccountId, Amount, EntryId, UserId};
use crate::ledger::entry::{EntryType, LedgerEntry, NewLedgerEntry};
use crate::ledger::store::{EntryTotals, LedgerStore};
use crate::store::StoreError;
use crate::transfer::status::TransferStatus;
use crate::transfer::store::{TransactionStore, TransferStore, TransferUnitOfWork};
use crate::transfer::types::{TransactionId, TransactionRecord};

#[derive(Default)]
struct MemState {
    accounts: HashMap<AccountId, Account>,
    transactions: HashMap<TransactionId, TransactionRecord>,
    by_key: HashMap<String, TransactionId>,
    entries: Vec<LedgerEntry>,
    next_account_id: AccountId,
    next_entry_id: EntryId,
}

impl MemState {
    fn totals(&self, account_id: AccountId) -> EntryTotals {
        let mut totals = EntryTotals::default();
        for entry in self.entries.iter().filter(|e| e.account_id == account_id) {
            match entry.entry_type {
                EntryType::Debit => totals.total_debit += entry.amount,
                EntryType::Credit => totals.total_credit += entry.amount,
            }
        }
        totals
    }
}

/// Shared in-memory backend
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemState>>,
    account_locks: Arc<Mutex<HashMap<AccountId, Arc<tokio::sync::Mutex<()>>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account
    pub fn add_account(&self, user_id: UserId, status: AccountStatus) -> Account {
        let mut state = self.state.lock().unwrap();
        state.next_account_id += 1;
        let now = chrono::Utc::now();
        let account = Account {
            account_id: state.next_account_id,
            user_id,
            status,
            currency: "USD".to_string(),
            created_at: now,
            updated_at: now,
        };
        state.accounts.insert(account.account_id, account.clone());
        account
    }

    /// Seed a standalone ledger entry (prior history for a test)
    pub fn seed_entry(
        &self,
        account_id: AccountId,
        entry_type: EntryType,
        amount: Amount,
    ) -> LedgerEntry {
        let mut state = self.state.lock().unwrap();
        state.next_entry_id += 1;
        let entry = LedgerEntry {
            entry_id: state.next_entry_id,
            account_id,
            transaction_id: TransactionId::new(),
            entry_type,
            amount,
            created_at: chrono::Utc::now(),
        };
        state.entries.push(entry.clone());
        entry
    }

    /// Total number of committed ledger entries
    pub fn entry_count(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }

    /// Number of committed transaction records
    pub fn transaction_count(&self) -> usize {
        self.state.lock().unwrap().transactions.len()
    }

    /// Force a record into a given status (to stage replay scenarios)
    pub fn put_transaction(&self, record: TransactionRecord) {
        let mut state = self.state.lock().unwrap();
        state
            .by_key
            .insert(record.idempotency_key.clone(), record.transaction_id);
        state.transactions.insert(record.transaction_id, record);
    }

    fn account_lock(&self, account_id: AccountId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.account_locks.lock().unwrap();
        locks.entry(account_id).or_default().clone()
    }
}

#[async_trait]
impl AccountRegistry for MemoryStore {
    async fn find_by_id(&self, account_id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.state.lock().unwrap().accounts.get(&account_id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Account>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut owned: Vec<&Account> = state
            .accounts
            .values()
            .filter(|a| a.user_id == user_id)
            .collect();
        owned.sort_by_key(|a| a.account_id);
        Ok(owned.first().map(|a| (*a).clone()))
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn debit_credit_totals(
        &self,
        account_id: AccountId,
    ) -> Result<EntryTotals, StoreError> {
        Ok(self.state.lock().unwrap().totals(account_id))
    }

    async fn entries_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .entries
            .iter()
            .filter(|e| e.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn entries_for_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .entries
            .iter()
            .filter(|e| e.transaction_id == transaction_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<TransactionRecord>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .by_key
            .get(key)
            .and_then(|id| state.transactions.get(id))
            .cloned())
    }

    async fn find_by_id(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<TransactionRecord>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .transactions
            .get(&transaction_id)
            .cloned())
    }
}

#[async_trait]
impl TransferStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn TransferUnitOfWork>, StoreError> {
        Ok(Box::new(MemoryUnitOfWork {
            store: self.clone(),
            guards: Vec::new(),
            staged_transactions: Vec::new(),
            staged_entries: Vec::new(),
            staged_status: Vec::new(),
        }))
    }
}

/// Staged writes, applied all at once on commit
pub struct MemoryUnitOfWork {
    store: MemoryStore,
    guards: Vec<OwnedMutexGuard<()>>,
    staged_transactions: Vec<TransactionRecord>,
    staged_entries: Vec<LedgerEntry>,
    staged_status: Vec<(TransactionId, TransferStatus, TransferStatus)>,
}

#[async_trait]
impl TransferUnitOfWork for MemoryUnitOfWork {
    async fn locked_balance(&mut self, account_id: AccountId) -> Result<Amount, StoreError> {
        {
            let state = self.store.state.lock().unwrap();
            if !state.accounts.contains_key(&account_id) {
                return Err(StoreError::NotFound);
            }
        }

        // Held until this unit of work is consumed; a concurrent debit
        // of the same account waits here, like FOR UPDATE.
        let lock = self.store.account_lock(account_id);
        let guard = lock.lock_owned().await;
        self.guards.push(guard);

        Ok(self.store.state.lock().unwrap().totals(account_id).net())
    }

    async fn insert_transaction(&mut self, record: &TransactionRecord) -> Result<(), StoreError> {
        let duplicate_staged = self
            .staged_transactions
            .iter()
            .any(|t| t.idempotency_key == record.idempotency_key);
        let duplicate_committed = self
            .store
            .state
            .lock()
            .unwrap()
            .by_key
            .contains_key(&record.idempotency_key);

        if duplicate_staged || duplicate_committed {
            return Err(StoreError::DuplicateKey);
        }

        self.staged_transactions.push(record.clone());
        Ok(())
    }

    async fn append_entry(&mut self, entry: NewLedgerEntry) -> Result<LedgerEntry, StoreError> {
        // Sequence values burn even if this scope rolls back
        let entry_id = {
            let mut state = self.store.state.lock().unwrap();
            state.next_entry_id += 1;
            state.next_entry_id
        };

        let entry = LedgerEntry {
            entry_id,
            account_id: entry.account_id,
            transaction_id: entry.transaction_id,
            entry_type: entry.entry_type,
            amount: entry.amount,
            created_at: chrono::Utc::now(),
        };
        self.staged_entries.push(entry.clone());
        Ok(entry)
    }

    async fn set_status(
        &mut self,
        transaction_id: TransactionId,
        expected: TransferStatus,
        new: TransferStatus,
    ) -> Result<(), StoreError> {
        if let Some(staged) = self
            .staged_transactions
            .iter_mut()
            .find(|t| t.transaction_id == transaction_id)
        {
            if staged.status != expected {
                return Err(StoreError::NotFound);
            }
            staged.status = new;
            staged.updated_at = chrono::Utc::now();
            return Ok(());
        }

        let exists = {
            let state = self.store.state.lock().unwrap();
            state
                .transactions
                .get(&transaction_id)
                .map(|t| t.status == expected)
        };
        match exists {
            Some(true) => {
                self.staged_status.push((transaction_id, expected, new));
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }

    async fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        let mut state = self.store.state.lock().unwrap();

        // The unique-index check happens at the commit point, so a
        // same-key race loses here even if both scopes staged cleanly.
        for record in &self.staged_transactions {
            if state.by_key.contains_key(&record.idempotency_key) {
                return Err(StoreError::DuplicateKey);
            }
        }

        for record in self.staged_transactions.drain(..) {
            state
                .by_key
                .insert(record.idempotency_key.clone(), record.transaction_id);
            state.transactions.insert(record.transaction_id, record);
        }
        for entry in self.staged_entries.drain(..) {
            state.entries.push(entry);
        }
        for (transaction_id, expected, new) in self.staged_status.drain(..) {
            if let Some(record) = state.transactions.get_mut(&transaction_id) {
                if record.status == expected {
                    record.status = new;
                    record.updated_at = chrono::Utc::now();
                }
            }
        }

        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        // Staged writes and account guards drop together
        Ok(())
    }
}
