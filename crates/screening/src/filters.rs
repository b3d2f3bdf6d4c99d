use crate::config::ScannerConfig;
use crate::token::TokenScanResult;

/// A single screening rule applied to scan results
pub trait TokenFilter: Send + Sync {
    /// Name of the filter for logging
    fn name(&self) -> &str;

    /// Whether the token passes this filter
    fn apply(&self, token: &TokenScanResult) -> bool;
}

/// Filter requiring a minimum liquidity in USD
pub struct MinLiquidityFilter {
    min_liquidity_usd: f64,
}

impl MinLiquidityFilter {
    pub fn new(min_liquidity_usd: f64) -> Self {
        Self { min_liquidity_usd }
    }
}

impl TokenFilter for MinLiquidityFilter {
    fn name(&self) -> &str {
        "min_liquidity"
    }

    fn apply(&self, token: &TokenScanResult) -> bool {
        token.liquidity_usd >= self.min_liquidity_usd
    }
}

/// Filter capping the acceptable rug score
pub struct MaxRugScoreFilter {
    max_score: u8,
}

impl MaxRugScoreFilter {
    pub fn new(max_score: u8) -> Self {
        Self { max_score }
    }
}

impl TokenFilter for MaxRugScoreFilter {
    fn name(&self) -> &str {
        "max_rug_score"
    }

    fn apply(&self, token: &TokenScanResult) -> bool {
        token.rug_score <= self.max_score
    }
}

/// Filter capping the acceptable top-holder share of supply
pub struct MaxTopHolderFilter {
    max_pct: f64,
}

impl MaxTopHolderFilter {
    pub fn new(max_pct: f64) -> Self {
        Self { max_pct }
    }
}

impl TokenFilter for MaxTopHolderFilter {
    fn name(&self) -> &str {
        "max_top_holder"
    }

    fn apply(&self, token: &TokenScanResult) -> bool {
        token.top_holder_pct <= self.max_pct
    }
}

/// Filter accepting only verified tokens
pub struct VerifiedOnlyFilter;

impl TokenFilter for VerifiedOnlyFilter {
    fn name(&self) -> &str {
        "verified_only"
    }

    fn apply(&self, token: &TokenScanResult) -> bool {
        token.is_verified
    }
}

/// Filter dropping high-risk and rugged tokens
pub struct LowRiskFilter;

impl TokenFilter for LowRiskFilter {
    fn name(&self) -> &str {
        "low_risk"
    }

    fn apply(&self, token: &TokenScanResult) -> bool {
        !token.is_high_risk && !token.is_rugged
    }
}

/// Ordered chain of filters; a token passes only if every filter accepts it
pub struct FilterChain {
    filters: Vec<Box<dyn TokenFilter>>,
}

impl FilterChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Build the "low risk view" for a scanner config.
    ///
    /// SOL-denominated thresholds are converted to USD here, once, using
    /// the provided SOL price; filters themselves compare in USD only.
    pub fn from_config(config: &ScannerConfig, sol_price_usd: f64) -> Self {
        let mut chain = Self::new();
        chain.add_filter(Box::new(LowRiskFilter));
        if config.min_liquidity_sol > 0.0 {
            chain.add_filter(Box::new(MinLiquidityFilter::new(
                config.min_liquidity_sol * sol_price_usd,
            )));
        }
        if config.max_rug_score < 100 {
            chain.add_filter(Box::new(MaxRugScoreFilter::new(config.max_rug_score)));
        }
        if config.max_top_holder_pct < 100.0 {
            chain.add_filter(Box::new(MaxTopHolderFilter::new(config.max_top_holder_pct)));
        }
        if config.only_verified {
            chain.add_filter(Box::new(VerifiedOnlyFilter));
        }
        chain
    }

    /// Append a filter to the chain
    pub fn add_filter(&mut self, filter: Box<dyn TokenFilter>) {
        self.filters.push(filter);
    }

    /// Whether the token passes every filter
    pub fn apply(&self, token: &TokenScanResult) -> bool {
        self.filters.iter().all(|filter| filter.apply(token))
    }

    /// Tokens from the slice that pass every filter
    pub fn select(&self, tokens: &[TokenScanResult]) -> Vec<TokenScanResult> {
        tokens
            .iter()
            .filter(|token| self.apply(token))
            .cloned()
            .collect()
    }

    /// Number of filters in the chain
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}
