//! Account balance handler

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::super::state::AppState;
use super::super::types::{ApiResponse, BalanceData, error_codes};
use crate::account::AccountRegistry;
use crate::core_types::AccountId;

/// Derived balance endpoint
///
/// GET /api/v1/accounts/balance/{account_id}
///
/// The balance is recomputed from the ledger on every call; there is no
/// cached figure to go stale.
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<AccountId>,
) -> Result<Json<ApiResponse<BalanceData>>, (StatusCode, Json<ApiResponse<()>>)> {
    let account = state.accounts.find_by_id(account_id).await.map_err(|e| {
        tracing::error!(account_id, error = %e, "account lookup failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(
                error_codes::INTERNAL_ERROR,
                "account lookup failed",
            )),
        )
    })?;

    if account.is_none() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(
                error_codes::ACCOUNT_NOT_FOUND,
                format!("Account {} not found", account_id),
            )),
        ));
    }

    let balance = state.balances.get_balance(account_id).await.map_err(|e| {
        tracing::error!(account_id, error = %e, "balance derivation failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(
                error_codes::INTERNAL_ERROR,
                "balance derivation failed",
            )),
        )
    })?;

    Ok(Json(ApiResponse::success(BalanceData {
        account_id,
        balance,
    })))
}
