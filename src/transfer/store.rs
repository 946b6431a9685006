//! Transaction record store and the transfer unit of work
//!
//! Two seams live here:
//!
//! - [`TransactionStore`]: read access to transfer metadata, keyed by
//!   idempotency key or transaction ID.
//! - [`TransferStore`] / [`TransferUnitOfWork`]: the atomic-write
//!   boundary. The engine opens one unit of work per transfer, performs
//!   every write through it, and consumes it exactly once with
//!   `commit` or `rollback`. Either all records become visible together
//!   or none do.
//!
//! The PostgreSQL implementation maps the unit of work onto a native
//! sqlx transaction. `locked_balance` takes `FOR UPDATE` on the source
//! account row before re-deriving the balance, so two concurrent
//! transfers out of the same account serialize and the second sees the
//! first one's entries. Duplicate idempotency keys are rejected by the
//! unique index and surface as [`StoreError::DuplicateKey`].

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row};

use super::status::TransferStatus;
use super::types::{TransactionId, TransactionRecord};
use crate::core_types::{AccountId, Amount};
use crate::ledger::entry::{EntryType, LedgerEntry, NewLedgerEntry};
use crate::store::StoreError;

/// Read access to transfer metadata
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Look up the transaction owning an idempotency key, if any
    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<TransactionRecord>, StoreError>;

    /// Look up a transaction by ID
    async fn find_by_id(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<TransactionRecord>, StoreError>;
}

/// Factory for transfer units of work
#[async_trait]
pub trait TransferStore: Send + Sync {
    /// Open a fresh atomic scope
    async fn begin(&self) -> Result<Box<dyn TransferUnitOfWork>, StoreError>;
}

/// One transfer's pending atomic operations
///
/// Writes staged here are invisible to every other request until
/// `commit` returns Ok. The scope must be consumed exactly once; a
/// dropped scope rolls back.
#[async_trait]
pub trait TransferUnitOfWork: Send {
    /// Lock the source account against concurrent debits and re-derive
    /// its balance inside this scope
    async fn locked_balance(&mut self, account_id: AccountId) -> Result<Amount, StoreError>;

    /// Insert a PENDING transaction record; duplicate idempotency keys
    /// fail with [`StoreError::DuplicateKey`]
    async fn insert_transaction(&mut self, record: &TransactionRecord) -> Result<(), StoreError>;

    /// Append one ledger entry
    async fn append_entry(&mut self, entry: NewLedgerEntry) -> Result<LedgerEntry, StoreError>;

    /// Compare-and-swap the transaction status; fails if the current
    /// status does not match `expected`
    async fn set_status(
        &mut self,
        transaction_id: TransactionId,
        expected: TransferStatus,
        new: TransferStatus,
    ) -> Result<(), StoreError>;

    /// Make every staged write durable and visible at once
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// Discard every staged write
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

fn row_to_record(row: &PgRow) -> Result<TransactionRecord, StoreError> {
    let transaction_id_str: String = row.get("transaction_id");
    let transaction_id: TransactionId = transaction_id_str
        .parse()
        .map_err(|_| StoreError::Corrupt("Invalid transaction_id format".to_string()))?;

    let status_id: i16 = row.get("status");
    let status = TransferStatus::from_id(status_id)
        .ok_or_else(|| StoreError::Corrupt(format!("Invalid status ID: {}", status_id)))?;

    Ok(TransactionRecord {
        transaction_id,
        from_account: row.get("from_account"),
        to_account: row.get("to_account"),
        amount: row.get("amount"),
        idempotency_key: row.get("idempotency_key"),
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn map_insert_err(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = e {
        if db.is_unique_violation() {
            return StoreError::DuplicateKey;
        }
    }
    e.into()
}

/// PostgreSQL-backed transaction record reads
pub struct PgTransactionStore {
    pool: PgPool,
}

impl PgTransactionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionStore for PgTransactionStore {
    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<TransactionRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT transaction_id, from_account, to_account, amount,
                   idempotency_key, status, created_at, updated_at
            FROM transactions_tb
            WHERE idempotency_key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<TransactionRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT transaction_id, from_account, to_account, amount,
                   idempotency_key, status, created_at, updated_at
            FROM transactions_tb
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_record(&row)?)),
            None => Ok(None),
        }
    }
}

/// PostgreSQL-backed unit-of-work factory
pub struct PgTransferStore {
    pool: PgPool,
}

impl PgTransferStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransferStore for PgTransferStore {
    async fn begin(&self) -> Result<Box<dyn TransferUnitOfWork>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTransferUnitOfWork { tx }))
    }
}

/// One open sqlx transaction
pub struct PgTransferUnitOfWork {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl TransferUnitOfWork for PgTransferUnitOfWork {
    async fn locked_balance(&mut self, account_id: AccountId) -> Result<Amount, StoreError> {
        // Row lock first: concurrent debits of this account queue here
        // until the winner commits or rolls back.
        let locked =
            sqlx::query(r#"SELECT account_id FROM accounts_tb WHERE account_id = $1 FOR UPDATE"#)
                .bind(account_id)
                .fetch_optional(&mut *self.tx)
                .await?;

        if locked.is_none() {
            return Err(StoreError::NotFound);
        }

        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE entry_type = $2), 0)::BIGINT AS total_debit,
                COALESCE(SUM(amount) FILTER (WHERE entry_type = $3), 0)::BIGINT AS total_credit
            FROM ledger_entries_tb
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .bind(EntryType::Debit.id())
        .bind(EntryType::Credit.id())
        .fetch_one(&mut *self.tx)
        .await?;

        let total_debit: Amount = row.get("total_debit");
        let total_credit: Amount = row.get("total_credit");
        Ok(total_credit - total_debit)
    }

    async fn insert_transaction(&mut self, record: &TransactionRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO transactions_tb
                (transaction_id, from_account, to_account, amount,
                 idempotency_key, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.transaction_id.to_string())
        .bind(record.from_account)
        .bind(record.to_account)
        .bind(record.amount)
        .bind(&record.idempotency_key)
        .bind(record.status.id())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_insert_err)?;

        Ok(())
    }

    async fn append_entry(&mut self, entry: NewLedgerEntry) -> Result<LedgerEntry, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO ledger_entries_tb (account_id, transaction_id, entry_type, amount)
            VALUES ($1, $2, $3, $4)
            RETURNING entry_id, created_at
            "#,
        )
        .bind(entry.account_id)
        .bind(entry.transaction_id.to_string())
        .bind(entry.entry_type.id())
        .bind(entry.amount)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(LedgerEntry {
            entry_id: row.get("entry_id"),
            account_id: entry.account_id,
            transaction_id: entry.transaction_id,
            entry_type: entry.entry_type,
            amount: entry.amount,
            created_at: row.get("created_at"),
        })
    }

    async fn set_status(
        &mut self,
        transaction_id: TransactionId,
        expected: TransferStatus,
        new: TransferStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE transactions_tb
            SET status = $1, updated_at = NOW()
            WHERE transaction_id = $2 AND status = $3
            "#,
        )
        .bind(new.id())
        .bind(transaction_id.to_string())
        .bind(expected.id())
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
