use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;
use tracing::{info, warn};
use uuid::Uuid;

use solana_sniper_portfolio::{
    PositionLedger, TradeStatus, TransactionHistory, TransactionRecord,
};

use crate::locks::KeyedLock;
use crate::order::BuyOrder;
use crate::service::{TradeExecutionService, WalletSource};
use crate::{TradeError, TradeResult};

/// Serializes buy/sell execution against the wallet.
///
/// The coordinator guarantees at most one in-flight buy and one in-flight
/// sell per mint, appends a transaction record for every outcome, and is
/// the only caller of the ledger's mutation operations. Trades on
/// different mints proceed independently.
pub struct TradeCoordinator {
    /// Execution venue
    service: Arc<dyn TradeExecutionService>,

    /// Wallet connectivity and price oracle
    wallet: Arc<dyn WalletSource>,

    /// Open positions, mutated only through its own operations
    positions: Arc<PositionLedger>,

    /// Trade log
    transactions: Arc<TransactionHistory>,

    /// In-flight buy guard per mint
    buy_locks: KeyedLock<Pubkey>,

    /// In-flight sell guard per mint
    sell_locks: KeyedLock<Pubkey>,

    /// Set once the owning session has initialized
    ready: AtomicBool,
}

impl TradeCoordinator {
    /// Create a coordinator over the given collaborators
    pub fn new(
        service: Arc<dyn TradeExecutionService>,
        wallet: Arc<dyn WalletSource>,
        positions: Arc<PositionLedger>,
        transactions: Arc<TransactionHistory>,
    ) -> Self {
        Self {
            service,
            wallet,
            positions,
            transactions,
            buy_locks: KeyedLock::new(),
            sell_locks: KeyedLock::new(),
            ready: AtomicBool::new(false),
        }
    }

    /// Mark the coordinator usable; called by the session once
    /// initialization succeeds.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
    }

    /// Whether the coordinator accepts trades
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Position ledger this coordinator writes through
    pub fn positions(&self) -> &Arc<PositionLedger> {
        &self.positions
    }

    /// Trade log this coordinator appends to
    pub fn transactions(&self) -> &Arc<TransactionHistory> {
        &self.transactions
    }

    async fn check_preconditions(&self) -> TradeResult<()> {
        if !self.is_ready() {
            return Err(TradeError::Precondition(
                "bot session not initialized".to_string(),
            ));
        }
        if !self.wallet.is_connected().await {
            return Err(TradeError::Precondition(
                "wallet not connected".to_string(),
            ));
        }
        Ok(())
    }

    /// Execute a buy for the order's mint.
    ///
    /// A second buy for the same mint while this one is pending fails with
    /// [`TradeError::Concurrency`]. On success the position is upserted
    /// (weighted-mean cost basis) and a `Bought` record appended; on
    /// failure an `Error` record is appended and positions are untouched.
    pub async fn execute_buy(&self, order: &BuyOrder) -> TradeResult<String> {
        self.check_preconditions().await?;
        if !(order.amount_sol > 0.0) {
            return Err(TradeError::Validation(format!(
                "buy amount must be positive, got {} SOL",
                order.amount_sol
            )));
        }
        if !(order.token_price_usd > 0.0) {
            return Err(TradeError::Validation(format!(
                "token quote must be positive, got {}",
                order.token_price_usd
            )));
        }

        let _guard = self
            .buy_locks
            .try_acquire(order.mint)
            .ok_or(TradeError::Concurrency(order.mint))?;

        let attempt_id = Uuid::new_v4();
        self.transactions.record(TransactionRecord::now(
            attempt_id,
            order.mint,
            &order.symbol,
            TradeStatus::Buying,
            format!("buying for {} SOL", order.amount_sol),
        ));

        let sol_price_usd = match self.wallet.sol_price_usd().await {
            Ok(price) => price,
            Err(err) => return Err(self.fail_attempt(attempt_id, order.mint, &order.symbol, err)),
        };

        match self.service.execute_buy(&order.mint, order.amount_sol).await {
            Ok(transaction_id) => {
                let token_amount = order.amount_sol * sol_price_usd / order.token_price_usd;
                self.positions.apply_buy(
                    order.mint,
                    &order.symbol,
                    token_amount,
                    order.token_price_usd,
                );
                self.transactions.record(TransactionRecord::now(
                    attempt_id,
                    order.mint,
                    &order.symbol,
                    TradeStatus::Bought,
                    format!(
                        "bought {:.4} {} for {} SOL ({})",
                        token_amount, order.symbol, order.amount_sol, transaction_id
                    ),
                ));
                info!(mint = %order.mint, token_amount, %transaction_id, "buy filled");
                Ok(transaction_id)
            }
            Err(err) => Err(self.fail_attempt(attempt_id, order.mint, &order.symbol, err)),
        }
    }

    /// Sell an exact token amount out of the mint's open position.
    ///
    /// Validates `0 < amount ≤ position.amount` before anything is
    /// mutated. On success the position shrinks (removed at zero) and a
    /// `Success` record is appended; on failure an `Error` record is
    /// appended and the position is untouched.
    pub async fn sell_position(&self, mint: &Pubkey, amount: f64) -> TradeResult<bool> {
        self.check_preconditions().await?;

        let _guard = self
            .sell_locks
            .try_acquire(*mint)
            .ok_or(TradeError::Concurrency(*mint))?;

        let position = self.positions.get(mint).ok_or_else(|| {
            TradeError::Validation(format!("no open position for mint {mint}"))
        })?;
        if !(amount > 0.0) || amount > position.amount {
            return Err(TradeError::Validation(format!(
                "sell amount {} outside (0, {}]",
                amount, position.amount
            )));
        }

        let attempt_id = Uuid::new_v4();
        self.transactions.record(TransactionRecord::now(
            attempt_id,
            *mint,
            &position.symbol,
            TradeStatus::Selling,
            format!("selling {:.4} {}", amount, position.symbol),
        ));

        match self.service.execute_sell(mint, amount).await {
            Ok(transaction_id) => {
                let remaining = self.positions.apply_sell(mint, amount).unwrap_or(0.0);
                self.transactions.record(TransactionRecord::now(
                    attempt_id,
                    *mint,
                    &position.symbol,
                    TradeStatus::Success,
                    format!(
                        "sold {:.4} {}, {:.4} remaining ({})",
                        amount, position.symbol, remaining, transaction_id
                    ),
                ));
                info!(%mint, amount, remaining, %transaction_id, "sell filled");
                Ok(true)
            }
            Err(err) => Err(self.fail_attempt(attempt_id, *mint, &position.symbol, err)),
        }
    }

    /// Sell a percentage (0, 100] of the mint's open position
    pub async fn sell_position_pct(&self, mint: &Pubkey, percentage: f64) -> TradeResult<bool> {
        if !(percentage > 0.0 && percentage <= 100.0) {
            return Err(TradeError::Validation(format!(
                "sell percentage {percentage} outside (0, 100]"
            )));
        }
        let position = self.positions.get(mint).ok_or_else(|| {
            TradeError::Validation(format!("no open position for mint {mint}"))
        })?;

        // Sell the exact holding at 100% so float rounding cannot leave dust.
        let amount = if percentage >= 100.0 {
            position.amount
        } else {
            position.amount * percentage / 100.0
        };
        self.sell_position(mint, amount).await
    }

    fn fail_attempt(
        &self,
        attempt_id: Uuid,
        mint: Pubkey,
        symbol: &str,
        err: anyhow::Error,
    ) -> TradeError {
        warn!(%mint, %err, "trade attempt failed");
        self.transactions.record(TransactionRecord::now(
            attempt_id,
            mint,
            symbol,
            TradeStatus::Error,
            err.to_string(),
        ));
        TradeError::Execution(err.to_string())
    }
}
