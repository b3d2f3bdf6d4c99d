use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::classifier::RiskAssessment;

/// A token surfaced by the discovery feed, before any risk analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredToken {
    /// Token mint address
    pub mint: Pubkey,

    /// Token symbol
    pub symbol: String,

    /// Token name
    pub name: String,

    /// Current price in USD
    pub price_usd: f64,

    /// Market cap in USD
    pub market_cap_usd: f64,

    /// Known social links
    pub links: TokenLinks,
}

/// Social links attached to a discovered token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenLinks {
    /// Website URL
    pub website: Option<String>,

    /// Twitter handle
    pub twitter: Option<String>,

    /// Telegram group
    pub telegram: Option<String>,
}

/// Risk report for a single mint as returned by the analysis service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RugReport {
    /// Rug risk score (0-100, higher is worse)
    pub score: u8,

    /// Liquidity backing the token in USD
    pub liquidity_usd: f64,

    /// Verification details, absent when the token is unknown to the service
    pub verification: Option<Verification>,

    /// Largest holders, sorted by share of supply
    pub top_holders: Vec<HolderShare>,

    /// Human-readable risk findings
    pub risks: Vec<String>,

    /// Whether the token has already been rugged
    pub is_rugged: bool,
}

/// Verification details from the analysis service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    /// Whether the token passed verification
    pub verified: bool,
}

/// Share of supply held by a single wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolderShare {
    /// Holder address
    pub address: Pubkey,

    /// Percentage of total supply
    pub percentage: f64,
}

impl RugReport {
    /// Score substituted when a lookup fails
    pub const NEUTRAL_SCORE: u8 = 50;

    /// Report used in place of a failed lookup so a single bad token
    /// cannot abort a whole scan cycle.
    pub fn neutral() -> Self {
        Self {
            score: Self::NEUTRAL_SCORE,
            liquidity_usd: 0.0,
            verification: None,
            top_holders: Vec::new(),
            risks: Vec::new(),
            is_rugged: false,
        }
    }
}

/// A discovered token together with its classification.
///
/// Replaced wholesale whenever a newer classification is computed for the
/// same mint, never partially mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenScanResult {
    /// Token mint address
    pub mint: Pubkey,

    /// Token symbol
    pub symbol: String,

    /// Token name
    pub name: String,

    /// Current price in USD
    pub price_usd: f64,

    /// Market cap in USD
    pub market_cap_usd: f64,

    /// Liquidity backing the token in USD
    pub liquidity_usd: f64,

    /// Whether any liquidity is locked
    pub liquidity_locked: bool,

    /// Rug risk score (0-100, higher is worse)
    pub rug_score: u8,

    /// Share of supply held by the largest holder
    pub top_holder_pct: f64,

    /// Whether the token is verified
    pub is_verified: bool,

    /// Whether the token has already been rugged
    pub is_rugged: bool,

    /// Count of non-empty social links
    pub social_count: u8,

    /// Whether any high-risk rule fired
    pub is_high_risk: bool,

    /// When this classification was computed
    pub scanned_at: DateTime<Utc>,
}

impl TokenScanResult {
    /// Combine a discovery record with its classification.
    pub fn new(token: &DiscoveredToken, report: &RugReport, assessment: &RiskAssessment) -> Self {
        Self {
            mint: token.mint,
            symbol: token.symbol.clone(),
            name: token.name.clone(),
            price_usd: token.price_usd,
            market_cap_usd: token.market_cap_usd,
            liquidity_usd: report.liquidity_usd,
            liquidity_locked: assessment.liquidity_locked,
            rug_score: assessment.rug_score,
            top_holder_pct: assessment.top_holder_pct,
            is_verified: assessment.is_verified,
            is_rugged: assessment.is_rugged,
            social_count: assessment.social_count,
            is_high_risk: assessment.is_high_risk,
            scanned_at: Utc::now(),
        }
    }
}
