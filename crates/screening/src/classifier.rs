//! Deterministic risk classification for discovered tokens.
//!
//! Classification is a pure function of the discovery record and the rug
//! report, so re-running it on identical inputs always yields the same
//! assessment.

use crate::token::{DiscoveredToken, RugReport};

/// Rug score above which a token is flagged high risk
pub const HIGH_RISK_SCORE: u8 = 65;

/// Top-holder share of supply above which a token is flagged high risk
pub const HIGH_RISK_TOP_HOLDER_PCT: f64 = 80.0;

/// Market cap floor in USD; thinner tokens are flagged high risk
pub const HIGH_RISK_MARKET_CAP_USD: f64 = 100_000.0;

/// Derived risk profile for a single token
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    /// Rug risk score carried over from the report
    pub rug_score: u8,

    /// Whether any liquidity is locked
    pub liquidity_locked: bool,

    /// Whether the token is verified
    pub is_verified: bool,

    /// Share of supply held by the largest holder
    pub top_holder_pct: f64,

    /// Count of non-empty social links
    pub social_count: u8,

    /// Whether any high-risk rule fired
    pub is_high_risk: bool,

    /// Whether the token has already been rugged
    pub is_rugged: bool,
}

/// Classify a token from its discovery record and rug report.
///
/// Rules are evaluated in a fixed order; the high-risk flag is a
/// short-circuit OR, so any single condition is sufficient. The market-cap
/// threshold is USD-denominated.
pub fn classify(token: &DiscoveredToken, report: &RugReport) -> RiskAssessment {
    let liquidity_locked = report.liquidity_usd > 0.0;

    let is_verified = report
        .verification
        .as_ref()
        .map_or(false, |v| v.verified);

    let top_holder_pct = report
        .top_holders
        .first()
        .map_or(0.0, |holder| holder.percentage);

    let is_high_risk = report.score > HIGH_RISK_SCORE
        || top_holder_pct > HIGH_RISK_TOP_HOLDER_PCT
        || token.market_cap_usd < HIGH_RISK_MARKET_CAP_USD;

    let social_count = [
        &token.links.website,
        &token.links.twitter,
        &token.links.telegram,
    ]
    .iter()
    .filter(|link| link.as_deref().map_or(false, |url| !url.is_empty()))
    .count() as u8;

    RiskAssessment {
        rug_score: report.score,
        liquidity_locked,
        is_verified,
        top_holder_pct,
        social_count,
        is_high_risk,
        is_rugged: report.is_rugged,
    }
}
