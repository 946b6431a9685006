//! HTTP Gateway
//!
//! Axum router exposing the transfer operation surface. Route groups:
//!
//! - `/api/v1/health` — public liveness probe
//! - `/api/v1/*` — bearer-token protected: balance reads, transfer
//!   submission, transaction status lookup
//! - `/api/v1/transactions/system/*` — system-principal only

pub mod handlers;
pub mod state;
pub mod types;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::auth::middleware::{jwt_auth_middleware, system_auth_middleware};
use state::AppState;

/// Start the HTTP gateway server
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) {
    // ==========================================================================
    // Private routes (bearer token required)
    // ==========================================================================
    let private_routes = Router::new()
        .route("/accounts/balance/{account_id}", get(handlers::get_balance))
        .route("/transactions", post(handlers::create_transaction))
        .route(
            "/transactions/{transaction_id}",
            get(handlers::get_transaction),
        )
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    // ==========================================================================
    // System routes (system principal required)
    // ==========================================================================
    let system_routes = Router::new()
        .route(
            "/transactions/system/initial-funds",
            post(handlers::create_initial_funds),
        )
        .layer(from_fn_with_state(state.clone(), system_auth_middleware));

    // Build complete router
    let app = Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .nest("/api/v1", private_routes)
        .nest("/api/v1", system_routes)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("FATAL: Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Gateway listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("FATAL: Server error: {}", e);
        std::process::exit(1);
    }
}
