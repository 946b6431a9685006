//! Transfer error types

use thiserror::Error;

use crate::account::AccountStatus;
use crate::core_types::{AccountId, Amount};
use crate::store::StoreError;

/// Everything a transfer submission can fail with
///
/// Error codes and HTTP status suggestions keep API responses
/// consistent across handlers.
#[derive(Error, Debug)]
pub enum TransferError {
    // === Validation errors (no side effects) ===
    #[error("{0}")]
    InvalidRequest(String),

    #[error("account {account_id} is {status}, both accounts must be ACTIVE")]
    AccountNotActive {
        account_id: AccountId,
        status: AccountStatus,
    },

    #[error("insufficient balance: current balance is {balance}, requested amount is {requested}")]
    InsufficientFunds { balance: Amount, requested: Amount },

    // === Idempotency ===
    /// A concurrent request with the same key won the race
    #[error("a transaction with this idempotency key already exists")]
    DuplicateKey,

    /// A previous attempt with this key is recorded FAILED; the caller
    /// must retry explicitly
    #[error("transaction processing failed previously, please retry")]
    PreviousAttemptFailed,

    // === Server errors ===
    /// The atomic write did not complete; the transaction is absent or
    /// left non-COMPLETED
    #[error("transfer did not complete: {cause}")]
    TransferFailed { cause: String },

    #[error("storage error: {0}")]
    Store(StoreError),
}

impl TransferError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::InvalidRequest(_) => "INVALID_REQUEST",
            TransferError::AccountNotActive { .. } => "ACCOUNT_NOT_ACTIVE",
            TransferError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            TransferError::DuplicateKey => "DUPLICATE_KEY",
            TransferError::PreviousAttemptFailed => "PREVIOUS_ATTEMPT_FAILED",
            TransferError::TransferFailed { .. } => "TRANSFER_FAILED",
            TransferError::Store(_) => "STORE_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::InvalidRequest(_) => 400,
            TransferError::AccountNotActive { .. } | TransferError::InsufficientFunds { .. } => 422,
            TransferError::DuplicateKey => 409,
            TransferError::PreviousAttemptFailed
            | TransferError::TransferFailed { .. }
            | TransferError::Store(_) => 500,
        }
    }
}

impl From<StoreError> for TransferError {
    fn from(e: StoreError) -> Self {
        match e {
            // The unique index is the authoritative dedup guard; losers
            // of a same-key race surface as a conflict, not a storage
            // fault.
            StoreError::DuplicateKey => TransferError::DuplicateKey,
            other => TransferError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            TransferError::InvalidRequest("x".into()).code(),
            "INVALID_REQUEST"
        );
        assert_eq!(
            TransferError::InsufficientFunds {
                balance: 300,
                requested: 1000
            }
            .code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(TransferError::DuplicateKey.code(), "DUPLICATE_KEY");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(TransferError::InvalidRequest("x".into()).http_status(), 400);
        assert_eq!(
            TransferError::AccountNotActive {
                account_id: 1,
                status: AccountStatus::Frozen
            }
            .http_status(),
            422
        );
        assert_eq!(TransferError::DuplicateKey.http_status(), 409);
        assert_eq!(TransferError::PreviousAttemptFailed.http_status(), 500);
        assert_eq!(
            TransferError::TransferFailed {
                cause: "x".into()
            }
            .http_status(),
            500
        );
    }

    #[test]
    fn test_insufficient_funds_message_carries_both_figures() {
        let err = TransferError::InsufficientFunds {
            balance: 300,
            requested: 1000,
        };
        let msg = err.to_string();
        assert!(msg.contains("300"));
        assert!(msg.contains("1000"));
    }

    #[test]
    fn test_duplicate_key_store_error_maps_to_conflict() {
        let err: TransferError = StoreError::DuplicateKey.into();
        assert!(matches!(err, TransferError::DuplicateKey));

        let err: TransferError = StoreError::NotFound.into();
        assert!(matches!(err, TransferError::Store(_)));
    }
}
