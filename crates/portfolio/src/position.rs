use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Amounts at or below this are treated as a closed position
pub(crate) const DUST_AMOUNT: f64 = 1e-9;

/// An open holding acquired through one or more buys
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Token mint address
    pub mint: Pubkey,

    /// Token symbol
    pub symbol: String,

    /// Token amount currently held
    pub amount: f64,

    /// Most recent buy time
    pub buy_time: DateTime<Utc>,

    /// Weighted-mean entry price per token in USD
    pub cost_basis: f64,

    /// Holding valued at the latest observed price in USD
    pub current_value: f64,
}

impl Position {
    /// Open a fresh position from a single fill
    pub fn open(mint: Pubkey, symbol: &str, amount: f64, price_usd: f64) -> Self {
        Self {
            mint,
            symbol: symbol.to_string(),
            amount,
            buy_time: Utc::now(),
            cost_basis: price_usd,
            current_value: amount * price_usd,
        }
    }

    /// Fold another fill into the position. The cost basis becomes the
    /// weighted mean across all fills and the buy time moves to now.
    pub fn add_fill(&mut self, amount: f64, price_usd: f64) {
        let total = self.amount + amount;
        self.cost_basis = (self.amount * self.cost_basis + amount * price_usd) / total;
        self.amount = total;
        self.buy_time = Utc::now();
        self.current_value = total * price_usd;
    }

    /// Shrink the position by a sold amount
    pub fn reduce(&mut self, amount: f64) {
        let price = if self.amount > DUST_AMOUNT {
            self.current_value / self.amount
        } else {
            self.cost_basis
        };
        self.amount -= amount;
        self.current_value = self.amount * price;
    }

    /// Revalue the holding at a fresh price
    pub fn revalue(&mut self, price_usd: f64) {
        self.current_value = self.amount * price_usd;
    }

    /// Whether the position has been fully liquidated
    pub fn is_closed(&self) -> bool {
        self.amount <= DUST_AMOUNT
    }

    /// Unrealized profit or loss in USD against the cost basis
    pub fn unrealized_pnl(&self) -> f64 {
        self.current_value - self.amount * self.cost_basis
    }
}
