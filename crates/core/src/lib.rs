//! Core session control for the sniper bot
//!
//! This module owns the one bot session of the process:
//! - Session lifecycle (idle, initializing, active, paused, stopped)
//! - Scan scheduling with drift-free rescheduling and safe cancellation
//! - Session statistics
//! - Error taxonomy for session-level failures

use tracing::info;

mod session;
mod stats;

pub use session::{BotMode, SniperBot};
pub use stats::SessionStats;

pub use solana_sniper_screening::ScanError;
pub use solana_sniper_trading::TradeError;

/// Error types for the session controller
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// A prerequisite collaborator was unavailable; the session stays
    /// idle and `initialize` may be retried.
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// Malformed configuration, rejected before any part was applied
    #[error("invalid configuration: {0}")]
    Validation(String),

    /// Operation attempted in a session state that does not allow it
    #[error("operation not allowed: {0}")]
    Precondition(String),

    /// A scan cycle failed or was superseded
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Result type for the session controller
pub type BotResult<T> = std::result::Result<T, BotError>;

/// Initialize logging for the application
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Logging initialized");
}

/// Module version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
