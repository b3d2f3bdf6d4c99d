//! Trade coordination for the sniper bot
//!
//! This module serializes buy and sell execution against the wallet:
//! - At most one in-flight trade per mint, enforced by explicit keyed locks
//! - Transaction logging and position bookkeeping on every outcome
//! - Collaborator traits for the execution service and wallet provider

mod coordinator;
mod locks;
mod order;
mod service;

pub use coordinator::TradeCoordinator;
pub use locks::{KeyedGuard, KeyedLock};
pub use order::BuyOrder;
pub use service::{TradeExecutionService, WalletSource};

use solana_sdk::pubkey::Pubkey;

/// Error types for the trading module
#[derive(Debug, thiserror::Error)]
pub enum TradeError {
    /// Session state or wallet connectivity does not allow the trade;
    /// nothing was changed.
    #[error("trade precondition not met: {0}")]
    Precondition(String),

    /// Malformed trade parameters, rejected before any mutation
    #[error("invalid trade parameters: {0}")]
    Validation(String),

    /// A trade for this mint is already in flight; the duplicate is
    /// surfaced rather than queued.
    #[error("trade already in flight for mint {0}")]
    Concurrency(Pubkey),

    /// The execution service failed; logged as an error transaction,
    /// position state untouched.
    #[error("trade execution failed: {0}")]
    Execution(String),
}

/// Result type for the trading module
pub type TradeResult<T> = std::result::Result<T, TradeError>;

/// Module version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
