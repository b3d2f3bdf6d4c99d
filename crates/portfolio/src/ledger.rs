use std::collections::HashMap;

use parking_lot::RwLock;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info};

use crate::position::Position;

/// Ledger of open positions, keyed by mint.
///
/// The ledger is the sole writer of position state; trade execution and
/// refresh paths all mutate through its operations and everything else
/// reads snapshots.
pub struct PositionLedger {
    positions: RwLock<HashMap<Pubkey, Position>>,
}

impl PositionLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            positions: RwLock::new(HashMap::new()),
        }
    }

    /// Record a buy fill: opens a new position or folds the fill into an
    /// existing one with a weighted-mean cost basis.
    pub fn apply_buy(&self, mint: Pubkey, symbol: &str, amount: f64, price_usd: f64) {
        let mut positions = self.positions.write();
        match positions.get_mut(&mint) {
            Some(position) => {
                position.add_fill(amount, price_usd);
                debug!(%mint, amount, total = position.amount, "added fill to position");
            }
            None => {
                positions.insert(mint, Position::open(mint, symbol, amount, price_usd));
                info!(%mint, amount, "opened position");
            }
        }
    }

    /// Record a sell fill, removing the position when it reaches zero.
    /// Returns the remaining amount, or `None` when no position exists
    /// for the mint.
    pub fn apply_sell(&self, mint: &Pubkey, amount: f64) -> Option<f64> {
        let mut positions = self.positions.write();
        let position = positions.get_mut(mint)?;
        position.reduce(amount);

        if position.is_closed() {
            positions.remove(mint);
            info!(%mint, "position fully liquidated");
            Some(0.0)
        } else {
            debug!(%mint, remaining = position.amount, "reduced position");
            Some(position.amount)
        }
    }

    /// Latest state of a single position
    pub fn get(&self, mint: &Pubkey) -> Option<Position> {
        self.positions.read().get(mint).cloned()
    }

    /// Snapshot of all open positions, most recent buy first
    pub fn positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.positions.read().values().cloned().collect();
        positions.sort_by(|a, b| b.buy_time.cmp(&a.buy_time));
        positions
    }

    /// Revalue every position against a fresh price map.
    ///
    /// Safe to call concurrently with itself: overlapping calls converge
    /// to the same values for the same price map.
    pub fn refresh(&self, prices: &HashMap<Pubkey, f64>) {
        let mut positions = self.positions.write();
        for (mint, position) in positions.iter_mut() {
            if let Some(price) = prices.get(mint) {
                position.revalue(*price);
            }
        }
    }

    /// Total value of all open positions in USD
    pub fn total_value(&self) -> f64 {
        self.positions
            .read()
            .values()
            .map(|position| position.current_value)
            .sum()
    }

    /// Number of open positions
    pub fn len(&self) -> usize {
        self.positions.read().len()
    }

    /// Whether the ledger holds no positions
    pub fn is_empty(&self) -> bool {
        self.positions.read().is_empty()
    }
}

impl Default for PositionLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buys_upsert_with_weighted_cost_basis() {
        let ledger = PositionLedger::new();
        let mint = Pubkey::new_unique();

        ledger.apply_buy(mint, "TEST", 100.0, 1.0);
        ledger.apply_buy(mint, "TEST", 300.0, 2.0);

        let position = ledger.get(&mint).unwrap();
        assert_eq!(position.amount, 400.0);
        assert!((position.cost_basis - 1.75).abs() < 1e-12);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn partial_sell_leaves_the_exact_remainder() {
        let ledger = PositionLedger::new();
        let mint = Pubkey::new_unique();
        ledger.apply_buy(mint, "TEST", 100.0, 1.0);

        let remaining = ledger.apply_sell(&mint, 40.0).unwrap();

        assert_eq!(remaining, 60.0);
        assert_eq!(ledger.get(&mint).unwrap().amount, 60.0);
    }

    #[test]
    fn full_sell_removes_the_position() {
        let ledger = PositionLedger::new();
        let mint = Pubkey::new_unique();
        ledger.apply_buy(mint, "TEST", 100.0, 1.0);

        let remaining = ledger.apply_sell(&mint, 100.0).unwrap();

        assert_eq!(remaining, 0.0);
        assert!(ledger.get(&mint).is_none());
        assert!(ledger.is_empty());
    }

    #[test]
    fn sell_against_unknown_mint_is_rejected() {
        let ledger = PositionLedger::new();

        assert!(ledger.apply_sell(&Pubkey::new_unique(), 10.0).is_none());
    }

    #[test]
    fn snapshot_orders_by_most_recent_buy() {
        let ledger = PositionLedger::new();
        let first = Pubkey::new_unique();
        let second = Pubkey::new_unique();

        ledger.apply_buy(first, "AAA", 10.0, 1.0);
        ledger.apply_buy(second, "BBB", 10.0, 1.0);

        let positions = ledger.positions();
        assert_eq!(positions[0].mint, second);
        assert_eq!(positions[1].mint, first);
    }

    #[test]
    fn refresh_is_idempotent() {
        let ledger = PositionLedger::new();
        let mint = Pubkey::new_unique();
        ledger.apply_buy(mint, "TEST", 100.0, 1.0);

        let prices = HashMap::from([(mint, 2.5)]);
        ledger.refresh(&prices);
        ledger.refresh(&prices);

        assert_eq!(ledger.get(&mint).unwrap().current_value, 250.0);
        assert_eq!(ledger.total_value(), 250.0);
    }
}
