//! Transfer handlers

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::super::state::AppState;
use super::super::types::{
    ApiResponse, CreateTransactionRequest, InitialFundsApiRequest, TransactionData, error_codes,
    transfer_error_code,
};
use crate::auth::AuthenticatedUser;
use crate::transfer::types::{InitialFundsRequest, NotificationOutcome, TransferRequest};
use crate::transfer::{TransactionId, TransferError, TransferOutcome};

type HandlerResult = Result<
    (StatusCode, Json<ApiResponse<TransactionData>>),
    (StatusCode, Json<ApiResponse<()>>),
>;

fn into_response(outcome: TransferOutcome) -> (StatusCode, Json<ApiResponse<TransactionData>>) {
    match outcome {
        TransferOutcome::Completed {
            transaction,
            notification,
        } => {
            let mut data = TransactionData::from(transaction);
            let msg = match notification {
                NotificationOutcome::Failed(err) => {
                    data.notification_error = Some(err);
                    "Transaction processed successfully, notification delivery failed"
                }
                NotificationOutcome::Delivered | NotificationOutcome::Skipped => {
                    "Transaction processed successfully"
                }
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success_msg(data, msg)),
            )
        }
        TransferOutcome::AlreadyProcessed(transaction) => (
            StatusCode::OK,
            Json(ApiResponse::success_msg(
                TransactionData::from(transaction),
                "Transaction already processed",
            )),
        ),
        TransferOutcome::InProgress => (
            StatusCode::ACCEPTED,
            Json(ApiResponse::accepted("Transaction is still processing")),
        ),
        TransferOutcome::Reversed(transaction) => (
            StatusCode::OK,
            Json(ApiResponse::success_msg(
                TransactionData::from(transaction),
                "Transaction was reversed",
            )),
        ),
    }
}

fn into_error(err: TransferError) -> (StatusCode, Json<ApiResponse<()>>) {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(code = err.code(), error = %err, "transfer request failed");
    }
    (
        status,
        Json(ApiResponse::<()>::error(
            transfer_error_code(&err),
            err.to_string(),
        )),
    )
}

/// Create transfer endpoint
///
/// POST /api/v1/transactions
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateTransactionRequest>,
) -> HandlerResult {
    let caller = user.as_caller();
    let request = TransferRequest {
        from_account: req.from_account,
        to_account: req.to_account,
        amount: req.amount,
        idempotency_key: req.idempotency_key,
    };

    match state.engine.transfer(&caller, request).await {
        Ok(outcome) => Ok(into_response(outcome)),
        Err(e) => Err(into_error(e)),
    }
}

/// Seed funds from the system caller's own account
///
/// POST /api/v1/transactions/system/initial-funds
pub async fn create_initial_funds(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<InitialFundsApiRequest>,
) -> HandlerResult {
    let caller = user.as_caller();
    let request = InitialFundsRequest {
        to_account: req.to_account,
        amount: req.amount,
        idempotency_key: req.idempotency_key,
    };

    match state.engine.initial_funds(&caller, request).await {
        Ok(outcome) => Ok(into_response(outcome)),
        Err(e) => Err(into_error(e)),
    }
}

/// Transaction status lookup
///
/// GET /api/v1/transactions/{transaction_id}
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(transaction_id): Path<String>,
) -> HandlerResult {
    let transaction_id: TransactionId = transaction_id.parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                error_codes::INVALID_REQUEST,
                "Invalid transaction ID format",
            )),
        )
    })?;

    match state.engine.get_transaction(transaction_id).await {
        Ok(Some(record)) => Ok((
            StatusCode::OK,
            Json(ApiResponse::success(TransactionData::from(record))),
        )),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(
                error_codes::TRANSACTION_NOT_FOUND,
                format!("Transaction {} not found", transaction_id),
            )),
        )),
        Err(e) => Err(into_error(e)),
    }
}
