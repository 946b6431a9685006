//! API response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `error_codes`: Standard error code constants
//! - Response DTOs

use serde::{Deserialize, Serialize};

use crate::core_types::{AccountId, Amount};
use crate::transfer::{TransactionRecord, TransferError};

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    pub code: i32,
    /// Response message
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Success response with a descriptive message
    pub fn success_msg(data: T, msg: impl Into<String>) -> Self {
        Self {
            code: 0,
            msg: msg.into(),
            data: Some(data),
        }
    }

    /// Success response carrying no data (e.g. accepted-but-pending)
    pub fn accepted(msg: impl Into<String>) -> Self {
        Self {
            code: 0,
            msg: msg.into(),
            data: None,
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

// ============================================================================
// Request DTOs
// ============================================================================

/// POST /api/v1/transactions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub from_account: AccountId,
    pub to_account: AccountId,
    pub amount: Amount,
    pub idempotency_key: String,
}

/// POST /api/v1/transactions/system/initial-funds
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialFundsApiRequest {
    pub to_account: AccountId,
    pub amount: Amount,
    pub idempotency_key: String,
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Transaction record as serialized in API responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    pub transaction_id: String,
    pub from_account: AccountId,
    pub to_account: AccountId,
    pub amount: Amount,
    pub idempotency_key: String,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
    /// Present only when notification dispatch failed post-commit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_error: Option<String>,
}

impl From<TransactionRecord> for TransactionData {
    fn from(record: TransactionRecord) -> Self {
        Self {
            transaction_id: record.transaction_id.to_string(),
            from_account: record.from_account,
            to_account: record.to_account,
            amount: record.amount,
            idempotency_key: record.idempotency_key,
            status: record.status.as_str().to_string(),
            created_at: record.created_at.timestamp_millis(),
            updated_at: record.updated_at.timestamp_millis(),
            notification_error: None,
        }
    }
}

/// Derived balance response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceData {
    pub account_id: AccountId,
    pub balance: Amount,
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_REQUEST: i32 = 1001;
    pub const INSUFFICIENT_FUNDS: i32 = 1002;
    pub const ACCOUNT_NOT_ACTIVE: i32 = 1003;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;
    pub const FORBIDDEN: i32 = 2003;

    // Resource errors (4xxx)
    pub const TRANSACTION_NOT_FOUND: i32 = 4001;
    pub const ACCOUNT_NOT_FOUND: i32 = 4002;
    pub const DUPLICATE_KEY: i32 = 4091;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const TRANSFER_FAILED: i32 = 5001;
}

/// API error code for a transfer failure
pub fn transfer_error_code(err: &TransferError) -> i32 {
    match err {
        TransferError::InvalidRequest(_) => error_codes::INVALID_REQUEST,
        TransferError::AccountNotActive { .. } => error_codes::ACCOUNT_NOT_ACTIVE,
        TransferError::InsufficientFunds { .. } => error_codes::INSUFFICIENT_FUNDS,
        TransferError::DuplicateKey => error_codes::DUPLICATE_KEY,
        TransferError::PreviousAttemptFailed | TransferError::TransferFailed { .. } => {
            error_codes::TRANSFER_FAILED
        }
        TransferError::Store(_) => error_codes::INTERNAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn test_success_envelope() {
        let resp = ApiResponse::success(BalanceData {
            account_id: 1,
            balance: 300,
        });
        assert_eq!(resp.code, 0);
        assert_eq!(resp.msg, "ok");
        assert!(resp.data.is_some());
    }

    #[test]
    fn test_error_envelope_has_no_data() {
        let resp = ApiResponse::<()>::error(error_codes::INVALID_REQUEST, "bad");
        assert_eq!(resp.code, error_codes::INVALID_REQUEST);
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_transfer_error_codes() {
        assert_eq!(
            transfer_error_code(&TransferError::DuplicateKey),
            error_codes::DUPLICATE_KEY
        );
        assert_eq!(
            transfer_error_code(&TransferError::InsufficientFunds {
                balance: 1,
                requested: 2
            }),
            error_codes::INSUFFICIENT_FUNDS
        );
        assert_eq!(
            transfer_error_code(&TransferError::Store(StoreError::NotFound)),
            error_codes::INTERNAL_ERROR
        );
    }

    #[test]
    fn test_transaction_data_camel_case() {
        let record = TransactionRecord::new(1, 2, 100, "k1");
        let json = serde_json::to_value(TransactionData::from(record)).unwrap();
        assert!(json.get("fromAccount").is_some());
        assert!(json.get("idempotencyKey").is_some());
        assert_eq!(json.get("status").unwrap(), "PENDING");
    }
}
