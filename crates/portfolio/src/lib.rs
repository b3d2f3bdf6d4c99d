//! Position and transaction bookkeeping for the sniper bot
//!
//! This module is the single writer for both collections:
//! - Open positions with weighted-mean cost basis
//! - A capped, deduplicated transaction history
//!
//! Everything else reads snapshots.

mod ledger;
mod position;
mod transactions;

pub use ledger::PositionLedger;
pub use position::Position;
pub use transactions::{
    TradeStatus, TransactionHistory, TransactionRecord, DEFAULT_HISTORY_LIMIT,
};

/// Module version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
