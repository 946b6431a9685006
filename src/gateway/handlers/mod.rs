//! HTTP handlers

pub mod account;
pub mod health;
pub mod transfer;

pub use account::get_balance;
pub use health::health_check;
pub use transfer::{create_initial_funds, create_transaction, get_transaction};
