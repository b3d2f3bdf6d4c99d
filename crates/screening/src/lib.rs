//! Token screening for the sniper bot
//!
//! This module discovers newly listed tokens and scores them for risk:
//! - Scan cycles over the discovery feed with concurrent rug lookups
//! - Deterministic risk classification
//! - Typed scan event bus for downstream consumers
//! - Config-driven token filters

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info, warn};

pub mod classifier;
pub mod config;
pub mod events;
pub mod filters;
pub mod source;
pub mod token;

pub use classifier::{
    classify, RiskAssessment, HIGH_RISK_MARKET_CAP_USD, HIGH_RISK_SCORE,
    HIGH_RISK_TOP_HOLDER_PCT,
};
pub use config::{ConfigError, ScannerConfig, ScannerConfigBuilder, MIN_SCAN_INTERVAL};
pub use events::{ScanEvent, ScanEventBus, ScanTopic, SubscriptionToken};
pub use filters::{FilterChain, TokenFilter};
pub use source::TokenMetadataSource;
pub use token::{
    DiscoveredToken, HolderShare, RugReport, TokenLinks, TokenScanResult, Verification,
};

/// Error types for the screening module
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScanError {
    /// The discovery feed itself was unreachable; the cycle was aborted
    /// before any state changed.
    #[error("token feed unavailable: {0}")]
    Source(String),

    /// The cycle's generation was superseded before commit; its results
    /// were discarded without touching state.
    #[error("scan cycle of generation {generation} superseded before commit")]
    Stale { generation: u64 },
}

/// Outcome of one committed scan cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Generation the cycle ran under
    pub generation: u64,

    /// When the cycle started
    pub started_at: DateTime<Utc>,

    /// Tokens fetched and classified this cycle
    pub tokens_scanned: usize,

    /// Mints seen for the first time this cycle
    pub new_tokens: usize,

    /// Wall-clock duration of the cycle in milliseconds
    pub duration_ms: u64,
}

/// Scanner engine: runs generation-tagged scan cycles over the discovery
/// feed and keeps the latest classification per mint.
pub struct ScannerEngine {
    /// Discovery feed and risk report provider
    source: Arc<dyn TokenMetadataSource>,

    /// Bus carrying scan-complete and new-token notifications
    events: Arc<ScanEventBus>,

    /// Latest classification per mint, replaced wholesale on re-scan
    results: DashMap<Pubkey, TokenScanResult>,

    /// Current scan generation; bumping it strands in-flight cycles
    generation: AtomicU64,
}

impl ScannerEngine {
    /// Create a new scanner engine over a metadata source
    pub fn new(source: Arc<dyn TokenMetadataSource>, events: Arc<ScanEventBus>) -> Self {
        Self {
            source,
            events,
            results: DashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Event bus the engine publishes on
    pub fn events(&self) -> &Arc<ScanEventBus> {
        &self.events
    }

    /// Generation the next cycle will run under
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Bump the generation so any in-flight cycle discards its results at
    /// commit time. Returns the new generation.
    pub fn invalidate(&self) -> u64 {
        let superseded = self.generation.fetch_add(1, Ordering::SeqCst);
        debug!(superseded, "scan generation invalidated");
        superseded + 1
    }

    /// Run one scan cycle: fetch the discovery feed, look up rug reports
    /// concurrently, classify, and commit the results.
    ///
    /// A lookup failure for one token substitutes the neutral report. The
    /// commit only happens if the generation captured at the start is
    /// still current; otherwise the whole cycle resolves to
    /// [`ScanError::Stale`] and no shared state is touched.
    pub async fn run_cycle(&self) -> Result<ScanSummary, ScanError> {
        let generation = self.generation.load(Ordering::SeqCst);
        let started = Instant::now();
        let started_at = Utc::now();

        let discovered = self
            .source
            .discovered_tokens()
            .await
            .map_err(|err| ScanError::Source(err.to_string()))?;
        debug!(generation, count = discovered.len(), "fetched discovery feed");

        let mut lookups = FuturesUnordered::new();
        for token in discovered {
            let source = Arc::clone(&self.source);
            lookups.push(async move {
                let report = match source.rug_report(&token.mint).await {
                    Ok(report) => report,
                    Err(err) => {
                        warn!(mint = %token.mint, %err, "rug lookup failed, using neutral report");
                        RugReport::neutral()
                    }
                };
                (token, report)
            });
        }

        // Lookups resolve in arbitrary order; the cycle completes only
        // after every one of them has.
        let mut classified = Vec::new();
        while let Some((token, report)) = lookups.next().await {
            let assessment = classifier::classify(&token, &report);
            classified.push(TokenScanResult::new(&token, &report, &assessment));
        }

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding superseded scan cycle");
            return Err(ScanError::Stale { generation });
        }

        let tokens_scanned = classified.len();
        let mut new_tokens = 0;
        for result in classified {
            let first_seen = self.results.insert(result.mint, result.clone()).is_none();
            if first_seen {
                new_tokens += 1;
                self.events.publish(&ScanEvent::NewToken(result));
            }
        }

        let summary = ScanSummary {
            generation,
            started_at,
            tokens_scanned,
            new_tokens,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        self.events.publish(&ScanEvent::ScanComplete(summary.clone()));
        info!(generation, tokens_scanned, new_tokens, "scan cycle committed");

        Ok(summary)
    }

    /// Latest classification for a mint
    pub fn token(&self, mint: &Pubkey) -> Option<TokenScanResult> {
        self.results.get(mint).map(|entry| entry.value().clone())
    }

    /// Snapshot of every tracked token, most recently scanned first
    pub fn tokens(&self) -> Vec<TokenScanResult> {
        let mut tokens: Vec<TokenScanResult> =
            self.results.iter().map(|entry| entry.value().clone()).collect();
        tokens.sort_by(|a, b| b.scanned_at.cmp(&a.scanned_at));
        tokens
    }

    /// Snapshot filtered down to the low-risk view for a config
    pub fn low_risk_tokens(
        &self,
        config: &ScannerConfig,
        sol_price_usd: f64,
    ) -> Vec<TokenScanResult> {
        FilterChain::from_config(config, sol_price_usd).select(&self.tokens())
    }

    /// Latest USD price per tracked mint
    pub fn price_map(&self) -> HashMap<Pubkey, f64> {
        self.results
            .iter()
            .map(|entry| (*entry.key(), entry.value().price_usd))
            .collect()
    }

    /// Number of tracked mints
    pub fn tracked_count(&self) -> usize {
        self.results.len()
    }
}

/// Module version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
