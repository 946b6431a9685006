//! Storage layer plumbing
//!
//! Connection pool management and the error type shared by every store
//! trait. Concrete PostgreSQL implementations live next to the traits
//! they implement (`account::registry`, `ledger::store`,
//! `transfer::store`); the in-memory test double lives in [`memory`].

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;

#[cfg(test)]
pub mod memory;

/// Errors surfaced by the storage layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Unique index on the idempotency key rejected an insert.
    #[error("idempotency key already exists")]
    DuplicateKey,

    /// An update or delete touched an existing ledger entry.
    #[error("ledger entries are immutable and cannot be modified or deleted")]
    ImmutabilityViolation,

    #[error("row not found")]
    NotFound,

    /// A stored value failed to map back to a domain type.
    #[error("invalid stored value: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        // The schema trigger raises with this message on any attempted
        // entry mutation; classify it as the integrity defect it is.
        if let sqlx::Error::Database(ref db) = e {
            if db.message().contains("ledger entries are immutable") {
                return StoreError::ImmutabilityViolation;
            }
        }
        StoreError::Database(e)
    }
}

/// PostgreSQL database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
