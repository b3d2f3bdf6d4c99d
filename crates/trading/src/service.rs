use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

/// Execution venue performing the actual swaps.
///
/// Implementations wrap whatever submits transactions on-chain (an
/// aggregator router, a direct AMM client, a simulator in tests). Both
/// calls resolve to an opaque transaction id or fail.
#[async_trait]
pub trait TradeExecutionService: Send + Sync {
    /// Spend `amount_sol` buying the mint
    async fn execute_buy(&self, mint: &Pubkey, amount_sol: f64) -> Result<String>;

    /// Sell `token_amount` of the mint back to SOL
    async fn execute_sell(&self, mint: &Pubkey, token_amount: f64) -> Result<String>;
}

/// Read-only view of the connected wallet
#[async_trait]
pub trait WalletSource: Send + Sync {
    /// Whether a wallet provider is connected
    async fn is_connected(&self) -> bool;

    /// Spendable SOL balance
    async fn sol_balance(&self) -> Result<f64>;

    /// Current SOL price in USD
    async fn sol_price_usd(&self) -> Result<f64>;
}
