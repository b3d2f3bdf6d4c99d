use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Point-in-time view of the session counters.
///
/// `success_rate` and `rules_active` are derived on read from the
/// transaction history and the current scanner config, so the session
/// remains the only writer of its own state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Scan cycles committed since the session was created
    pub scans_completed: u64,

    /// Screening rules the current config actually constrains with
    pub rules_active: u32,

    /// Successful trades over total completed attempts, 0.0 when none
    pub success_rate: f64,

    /// Buys triggered through the session
    pub triggered_buys: u64,

    /// Total time spent in the active state
    pub active_for: Duration,
}
