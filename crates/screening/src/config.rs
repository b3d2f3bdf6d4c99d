use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Hard floor for the scan interval
pub const MIN_SCAN_INTERVAL: Duration = Duration::from_secs(10);

/// Rejected scanner configuration
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid scanner config: {0}")]
pub struct ConfigError(pub String);

/// Scanner configuration
///
/// Replaced wholesale on update; an update that fails validation leaves
/// the previous configuration untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Minimum liquidity in SOL for a token to pass screening
    pub min_liquidity_sol: f64,

    /// Maximum acceptable rug score (0-100)
    pub max_rug_score: u8,

    /// Maximum acceptable top-holder share of supply (0-100)
    pub max_top_holder_pct: f64,

    /// Whether to screen out unverified tokens
    pub only_verified: bool,

    /// Time between scheduled scan cycles
    pub scan_interval: Duration,

    /// Whether scans run on a schedule while the session is active
    pub auto_scan: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            min_liquidity_sol: 5.0,
            max_rug_score: 70,
            max_top_holder_pct: 80.0,
            only_verified: false,
            scan_interval: Duration::from_secs(30),
            auto_scan: true,
        }
    }
}

impl ScannerConfig {
    /// Check every invariant; an `Err` means the config must be rejected
    /// without applying any part of it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_liquidity_sol.is_finite() || self.min_liquidity_sol < 0.0 {
            return Err(ConfigError(format!(
                "min_liquidity_sol must be a non-negative amount, got {}",
                self.min_liquidity_sol
            )));
        }
        if self.max_rug_score > 100 {
            return Err(ConfigError(format!(
                "max_rug_score must be within 0-100, got {}",
                self.max_rug_score
            )));
        }
        if !(0.0..=100.0).contains(&self.max_top_holder_pct) {
            return Err(ConfigError(format!(
                "max_top_holder_pct must be within 0-100, got {}",
                self.max_top_holder_pct
            )));
        }
        if self.scan_interval < MIN_SCAN_INTERVAL {
            return Err(ConfigError(format!(
                "scan_interval must be at least {:?}, got {:?}",
                MIN_SCAN_INTERVAL, self.scan_interval
            )));
        }
        Ok(())
    }

    /// Number of screening rules this config actually constrains with.
    /// Rules left at their permissive extreme do not count.
    pub fn active_rule_count(&self) -> u32 {
        let mut rules = 0;
        if self.min_liquidity_sol > 0.0 {
            rules += 1;
        }
        if self.max_rug_score < 100 {
            rules += 1;
        }
        if self.max_top_holder_pct < 100.0 {
            rules += 1;
        }
        if self.only_verified {
            rules += 1;
        }
        rules
    }
}

/// Builder for ScannerConfig
pub struct ScannerConfigBuilder {
    config: ScannerConfig,
}

impl ScannerConfigBuilder {
    /// Create a new config builder with default values
    pub fn new() -> Self {
        Self {
            config: ScannerConfig::default(),
        }
    }

    /// Set minimum liquidity in SOL
    pub fn min_liquidity_sol(mut self, min_liquidity_sol: f64) -> Self {
        self.config.min_liquidity_sol = min_liquidity_sol;
        self
    }

    /// Set maximum rug score
    pub fn max_rug_score(mut self, max_rug_score: u8) -> Self {
        self.config.max_rug_score = max_rug_score;
        self
    }

    /// Set maximum top-holder share
    pub fn max_top_holder_pct(mut self, max_top_holder_pct: f64) -> Self {
        self.config.max_top_holder_pct = max_top_holder_pct;
        self
    }

    /// Screen out unverified tokens
    pub fn only_verified(mut self, only_verified: bool) -> Self {
        self.config.only_verified = only_verified;
        self
    }

    /// Set the scheduled scan interval
    pub fn scan_interval(mut self, scan_interval: Duration) -> Self {
        self.config.scan_interval = scan_interval;
        self
    }

    /// Enable or disable scheduled scanning
    pub fn auto_scan(mut self, auto_scan: bool) -> Self {
        self.config.auto_scan = auto_scan;
        self
    }

    /// Validate and build the config
    pub fn build(self) -> Result<ScannerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ScannerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ScannerConfig::default().validate().is_ok());
    }

    #[test]
    fn sub_minimum_interval_is_rejected() {
        let config = ScannerConfig {
            scan_interval: Duration::from_secs(5),
            ..ScannerConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_thresholds_are_rejected() {
        let config = ScannerConfig {
            max_rug_score: 130,
            ..ScannerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ScannerConfig {
            max_top_holder_pct: 140.0,
            ..ScannerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ScannerConfig {
            min_liquidity_sol: -1.0,
            ..ScannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_rejects_invalid_combinations() {
        let result = ScannerConfigBuilder::new()
            .scan_interval(Duration::from_secs(2))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn rule_count_tracks_constraining_rules() {
        let config = ScannerConfig {
            min_liquidity_sol: 5.0,
            max_rug_score: 70,
            max_top_holder_pct: 80.0,
            only_verified: false,
            ..ScannerConfig::default()
        };
        assert_eq!(config.active_rule_count(), 3);

        let permissive = ScannerConfig {
            min_liquidity_sol: 0.0,
            max_rug_score: 100,
            max_top_holder_pct: 100.0,
            only_verified: false,
            ..ScannerConfig::default()
        };
        assert_eq!(permissive.active_rule_count(), 0);
    }
}
