//! Repository layer for account lookups
//!
//! The registry is injected into the transfer engine as a trait object so
//! tests can substitute an in-memory double. Account creation and status
//! transitions happen outside the transfer core; only the read surface is
//! modeled here.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::models::{Account, AccountStatus};
use crate::core_types::{AccountId, UserId};
use crate::store::StoreError;

/// Read-only account lookups consumed by the transfer engine
#[async_trait]
pub trait AccountRegistry: Send + Sync {
    /// Get account by ID
    async fn find_by_id(&self, account_id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Get a user's account (first match; system callers own exactly one)
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Account>, StoreError>;
}

/// PostgreSQL-backed account registry
pub struct PgAccountRegistry {
    pool: PgPool,
}

impl PgAccountRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_account(row: &sqlx::postgres::PgRow) -> Result<Account, StoreError> {
        let status_id: i16 = row.get("status");
        let status = AccountStatus::from_id(status_id)
            .ok_or_else(|| StoreError::Corrupt(format!("Invalid account status: {}", status_id)))?;

        Ok(Account {
            account_id: row.get("account_id"),
            user_id: row.get("user_id"),
            status,
            currency: row.get("currency"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl AccountRegistry for PgAccountRegistry {
    async fn find_by_id(&self, account_id: AccountId) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            r#"SELECT account_id, user_id, status, currency, created_at, updated_at
               FROM accounts_tb WHERE account_id = $1"#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            r#"SELECT account_id, user_id, status, currency, created_at, updated_at
               FROM accounts_tb WHERE user_id = $1
               ORDER BY account_id ASC
               LIMIT 1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }
}
