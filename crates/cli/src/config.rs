use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use solana_sniper_screening::ScannerConfig;

/// Top-level application configuration, loaded from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Scanner configuration handed to the session
    pub scanner: ScannerConfig,

    /// Parameters for the simulated collaborators
    pub simulation: SimulationConfig,

    /// Spend per auto-snipe in SOL
    pub buy_amount_sol: f64,

    /// Snipe low-risk discoveries automatically while running
    pub auto_buy: bool,

    /// Records kept in the transaction window
    pub history_limit: usize,
}

/// Parameters for the simulated metadata source, wallet and venue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// SOL price reported by the simulated wallet
    pub sol_price_usd: f64,

    /// Starting SOL balance of the simulated wallet
    pub wallet_balance_sol: f64,

    /// Tokens freshly listed per scan cycle
    pub tokens_per_scan: usize,

    /// Probability that a rug lookup fails
    pub lookup_failure_rate: f64,

    /// Probability that a trade submission fails
    pub trade_failure_rate: f64,

    /// Simulated venue latency in milliseconds
    pub trade_latency_ms: u64,

    /// Seed for the simulation RNG
    pub seed: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scanner: ScannerConfig::default(),
            simulation: SimulationConfig::default(),
            buy_amount_sol: 0.1,
            auto_buy: false,
            history_limit: 256,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sol_price_usd: 150.0,
            wallet_balance_sol: 10.0,
            tokens_per_scan: 4,
            lookup_failure_rate: 0.05,
            trade_failure_rate: 0.1,
            trade_latency_ms: 50,
            seed: 42,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&config_str)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("writing config file {}", path.display()))?;
        Ok(())
    }
}
