use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Buy request handed to the coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyOrder {
    /// Token mint address
    pub mint: Pubkey,

    /// Token symbol, carried into positions and the trade log
    pub symbol: String,

    /// Quoted price per token in USD
    pub token_price_usd: f64,

    /// Spend size in SOL
    pub amount_sol: f64,
}

impl BuyOrder {
    /// Build an order from a quote
    pub fn new(mint: Pubkey, symbol: &str, token_price_usd: f64, amount_sol: f64) -> Self {
        Self {
            mint,
            symbol: symbol.to_string(),
            token_price_usd,
            amount_sol,
        }
    }
}
