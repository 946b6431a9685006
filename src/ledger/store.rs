//! Ledger store read surface
//!
//! Reads only. Appending a ledger entry is possible exclusively through
//! the transfer unit of work ([`crate::transfer::store`]), which ties it
//! to the transaction record in one atomic scope. The absence of any
//! update/delete method here is the immutability guarantee at the API
//! boundary; the schema trigger enforces the same rule against raw SQL.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::entry::{EntryType, LedgerEntry};
use crate::core_types::{AccountId, Amount};
use crate::store::StoreError;
use crate::transfer::types::TransactionId;

/// DEBIT and CREDIT sums over a set of entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryTotals {
    pub total_debit: Amount,
    pub total_credit: Amount,
}

impl EntryTotals {
    /// Derived balance: credits minus debits
    #[inline]
    pub fn net(&self) -> Amount {
        self.total_credit - self.total_debit
    }
}

/// Read access to the append-only ledger
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Separate DEBIT/CREDIT sums for one account; zeroes when it has
    /// no entries
    async fn debit_credit_totals(&self, account_id: AccountId) -> Result<EntryTotals, StoreError>;

    /// All entries for one account, oldest first
    async fn entries_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<LedgerEntry>, StoreError>;

    /// All entries referencing one transaction (exactly two for a
    /// completed transfer)
    async fn entries_for_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Vec<LedgerEntry>, StoreError>;
}

/// PostgreSQL-backed ledger reads
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) fn row_to_entry(row: &sqlx::postgres::PgRow) -> Result<LedgerEntry, StoreError> {
        let type_id: i16 = row.get("entry_type");
        let entry_type = EntryType::from_id(type_id)
            .ok_or_else(|| StoreError::Corrupt(format!("Invalid entry type: {}", type_id)))?;

        let transaction_id_str: String = row.get("transaction_id");
        let transaction_id: TransactionId = transaction_id_str
            .parse()
            .map_err(|_| StoreError::Corrupt("Invalid transaction_id format".to_string()))?;

        Ok(LedgerEntry {
            entry_id: row.get("entry_id"),
            account_id: row.get("account_id"),
            transaction_id,
            entry_type,
            amount: row.get("amount"),
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn debit_credit_totals(
        &self,
        account_id: AccountId,
    ) -> Result<EntryTotals, StoreError> {
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
        .fetch_one(&self.pool)
        .await?;

        Ok(EntryTotals {
            total_debit: row.get("total_debit"),
            total_credit: row.get("total_credit"),
        })
    }

    async fn entries_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT entry_id, account_id, transaction_id, entry_type, amount, created_at
            FROM ledger_entries_tb
            WHERE account_id = $1
            ORDER BY entry_id ASC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(Self::row_to_entry(&row)?);
        }
        Ok(entries)
    }

    async fn entries_for_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT entry_id, account_id, transaction_id, entry_type, amount, created_at
            FROM ledger_entries_tb
            WHERE transaction_id = $1
            ORDER BY entry_id ASC
            "#,
        )
        .bind(transaction_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(Self::row_to_entry(&row)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_net() {
        let totals = EntryTotals {
            total_debit: 200,
            total_credit: 500,
        };
        assert_eq!(totals.net(), 300);

        assert_eq!(EntryTotals::default().net(), 0);

        let overdrawn = EntryTotals {
            total_debit: 700,
            total_credit: 500,
        };
        assert_eq!(overdrawn.net(), -200);
    }
}
