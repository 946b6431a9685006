//! ledgerflow - service entry point
//!
//! ```text
//! ┌──────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────┐
//! │  Config  │───▶│  PostgreSQL  │───▶│   Transfer   │───▶│  Gateway │
//! │  (YAML)  │    │    stores    │    │    Engine    │    │  (axum)  │
//! └──────────┘    └──────────────┘    └──────────────┘    └──────────┘
//! ```

use std::sync::Arc;

use ledgerflow::account::PgAccountRegistry;
use ledgerflow::auth::AuthVerifier;
use ledgerflow::config::AppConfig;
use ledgerflow::gateway::{self, state::AppState};
use ledgerflow::ledger::{BalanceCalculator, PgLedgerStore};
use ledgerflow::logging::init_logging;
use ledgerflow::notify::{LogNotifier, NotificationSink, WebhookNotifier};
use ledgerflow::store::Database;
use ledgerflow::transfer::{PgTransactionStore, PgTransferStore, TransferEngine};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);

    let _guard = init_logging(&config);
    tracing::info!(env = %env, build = env!("GIT_HASH"), "ledgerflow starting");

    let db = Arc::new(Database::connect(&config.postgres_url).await?);

    let accounts = Arc::new(PgAccountRegistry::new(db.pool().clone()));
    let ledger = Arc::new(PgLedgerStore::new(db.pool().clone()));
    let transactions = Arc::new(PgTransactionStore::new(db.pool().clone()));
    let transfer_store = Arc::new(PgTransferStore::new(db.pool().clone()));
    let balances = BalanceCalculator::new(ledger.clone());

    let notifier: Arc<dyn NotificationSink> = if config.notification.enabled {
        tracing::info!(url = %config.notification.webhook_url, "notification webhook enabled");
        Arc::new(WebhookNotifier::new(&config.notification)?)
    } else {
        tracing::info!("notification webhook disabled, logging only");
        Arc::new(LogNotifier)
    };

    let engine = Arc::new(TransferEngine::new(
        accounts.clone(),
        transactions,
        balances.clone(),
        transfer_store,
        notifier,
    ));

    let auth = Arc::new(AuthVerifier::new(config.jwt_secret.clone()));

    let state = Arc::new(AppState::new(engine, accounts, balances, auth, db));

    gateway::run_server(&config.gateway.host, config.gateway.port, state).await;

    Ok(())
}
