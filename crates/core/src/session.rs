use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use solana_sniper_portfolio::{PositionLedger, TransactionHistory};
use solana_sniper_screening::{
    ScanError, ScanSummary, ScannerConfig, ScannerEngine, TokenScanResult,
};
use solana_sniper_trading::{BuyOrder, TradeCoordinator, TradeResult, WalletSource};

use crate::stats::SessionStats;
use crate::{BotError, BotResult};

/// Operating mode of the bot session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotMode {
    /// Session created, not yet started
    Idle,

    /// Prerequisites are being probed
    Initializing,

    /// Session is live; scheduled scans run when auto-scan is enabled
    Active,

    /// Session suspended, accumulated state preserved
    Paused,

    /// Session shut down; terminal
    Stopped,
}

type SharedScan = Shared<BoxFuture<'static, Result<ScanSummary, ScanError>>>;

struct ScanLoopHandle {
    handle: JoinHandle<()>,
    interval_tx: watch::Sender<Duration>,
}

/// Owner of the process's one bot session.
///
/// All session state (mode, scanner config, statistics) is mutated only
/// through this controller's operations. Collaborators are injected at
/// construction and the caller owns the lifecycle: `initialize`, `start`,
/// `pause`, `stop`.
#[derive(Clone)]
pub struct SniperBot {
    inner: Arc<BotInner>,
}

struct BotInner {
    mode: RwLock<BotMode>,
    config: RwLock<ScannerConfig>,
    initialized: AtomicBool,
    scanner: Arc<ScannerEngine>,
    trader: Arc<TradeCoordinator>,
    positions: Arc<PositionLedger>,
    transactions: Arc<TransactionHistory>,
    wallet: Arc<dyn WalletSource>,
    scans_completed: AtomicU64,
    triggered_buys: AtomicU64,
    active_since: Mutex<Option<Instant>>,
    active_total: Mutex<Duration>,
    inflight_scan: Mutex<Option<SharedScan>>,
    scan_loop: Mutex<Option<ScanLoopHandle>>,
}

impl SniperBot {
    /// Create a session over the injected collaborators.
    ///
    /// The config is validated up front; the session starts `Idle` and
    /// must be initialized before trading.
    pub fn new(
        scanner: Arc<ScannerEngine>,
        trader: Arc<TradeCoordinator>,
        wallet: Arc<dyn WalletSource>,
        config: ScannerConfig,
    ) -> BotResult<Self> {
        config
            .validate()
            .map_err(|err| BotError::Validation(err.to_string()))?;

        let positions = Arc::clone(trader.positions());
        let transactions = Arc::clone(trader.transactions());

        Ok(Self {
            inner: Arc::new(BotInner {
                mode: RwLock::new(BotMode::Idle),
                config: RwLock::new(config),
                initialized: AtomicBool::new(false),
                scanner,
                trader,
                positions,
                transactions,
                wallet,
                scans_completed: AtomicU64::new(0),
                triggered_buys: AtomicU64::new(0),
                active_since: Mutex::new(None),
                active_total: Mutex::new(Duration::ZERO),
                inflight_scan: Mutex::new(None),
                scan_loop: Mutex::new(None),
            }),
        })
    }

    /// Current session mode
    pub fn mode(&self) -> BotMode {
        *self.inner.mode.read()
    }

    /// Snapshot of the current scanner config
    pub fn config(&self) -> ScannerConfig {
        self.inner.config.read().clone()
    }

    /// Scanner engine backing this session
    pub fn scanner(&self) -> &Arc<ScannerEngine> {
        &self.inner.scanner
    }

    /// Position ledger backing this session
    pub fn positions(&self) -> &Arc<PositionLedger> {
        &self.inner.positions
    }

    /// Trade log backing this session
    pub fn transactions(&self) -> &Arc<TransactionHistory> {
        &self.inner.transactions
    }

    /// Probe prerequisites and arm the session.
    ///
    /// Fails with [`BotError::Initialization`] and reverts to `Idle` when
    /// the wallet provider is unavailable; the call may simply be retried.
    /// Success arms the session but does not start it.
    pub async fn initialize(&self) -> BotResult<()> {
        {
            let mut mode = self.inner.mode.write();
            match *mode {
                BotMode::Idle => *mode = BotMode::Initializing,
                other => {
                    return Err(BotError::Precondition(format!(
                        "initialize not allowed while {other:?}"
                    )))
                }
            }
        }

        if !self.inner.wallet.is_connected().await {
            *self.inner.mode.write() = BotMode::Idle;
            return Err(BotError::Initialization(
                "wallet provider unavailable".to_string(),
            ));
        }

        self.inner.trader.mark_ready();
        self.inner.initialized.store(true, Ordering::SeqCst);
        *self.inner.mode.write() = BotMode::Idle;
        info!("bot session initialized");
        Ok(())
    }

    /// Move the session to `Active` and begin scheduled scanning when
    /// auto-scan is enabled. Allowed from an initialized `Idle` session
    /// or from `Paused`.
    pub fn start(&self) -> BotResult<()> {
        {
            let mut mode = self.inner.mode.write();
            match *mode {
                BotMode::Idle if self.inner.initialized.load(Ordering::SeqCst) => {}
                BotMode::Paused => {}
                BotMode::Idle => {
                    return Err(BotError::Precondition(
                        "session not initialized".to_string(),
                    ))
                }
                other => {
                    return Err(BotError::Precondition(format!(
                        "start not allowed while {other:?}"
                    )))
                }
            }
            *mode = BotMode::Active;
        }

        *self.inner.active_since.lock() = Some(Instant::now());
        if self.inner.config.read().auto_scan {
            self.spawn_scan_loop();
        }
        info!("bot session active");
        Ok(())
    }

    /// Suspend scheduled scanning, preserving accumulated statistics.
    /// Any in-flight scan cycle is invalidated and will discard its
    /// results instead of mutating state.
    pub fn pause(&self) -> BotResult<()> {
        {
            let mut mode = self.inner.mode.write();
            if *mode != BotMode::Active {
                return Err(BotError::Precondition(format!(
                    "pause not allowed while {:?}",
                    *mode
                )));
            }
            *mode = BotMode::Paused;
        }

        self.halt_scanning();
        info!("bot session paused");
        Ok(())
    }

    /// Shut the session down from any state. Cancels scheduled scans,
    /// invalidates in-flight cycles and releases every event-bus
    /// subscription. Terminal and idempotent.
    pub fn stop(&self) {
        {
            let mut mode = self.inner.mode.write();
            if *mode == BotMode::Stopped {
                return;
            }
            *mode = BotMode::Stopped;
        }

        self.halt_scanning();
        self.inner.scanner.events().clear();
        info!("bot session stopped");
    }

    /// Replace the scanner config wholesale.
    ///
    /// Validation failures reject the update without applying any part of
    /// it. While active, an interval change reschedules the next scan
    /// from now with no drift accumulation, and toggling auto-scan
    /// starts or cancels the loop.
    pub fn update_scanner_config(&self, config: ScannerConfig) -> BotResult<()> {
        config
            .validate()
            .map_err(|err| BotError::Validation(err.to_string()))?;

        let previous = {
            let mut slot = self.inner.config.write();
            std::mem::replace(&mut *slot, config.clone())
        };

        if self.mode() == BotMode::Active {
            if config.auto_scan && !previous.auto_scan {
                self.spawn_scan_loop();
            } else if !config.auto_scan && previous.auto_scan {
                if let Some(scan_loop) = self.inner.scan_loop.lock().take() {
                    scan_loop.handle.abort();
                }
            } else if config.auto_scan && config.scan_interval != previous.scan_interval {
                if let Some(scan_loop) = self.inner.scan_loop.lock().as_ref() {
                    let _ = scan_loop.interval_tx.send(config.scan_interval);
                }
            }
        }

        info!(
            interval = ?config.scan_interval,
            auto_scan = config.auto_scan,
            "scanner config updated"
        );
        Ok(())
    }

    /// Run one scan cycle now.
    ///
    /// Allowed in any non-stopped mode. At most one cycle executes at a
    /// time: a call made while one is outstanding awaits the in-flight
    /// cycle's result instead of launching a duplicate.
    pub async fn trigger_manual_scan(&self) -> BotResult<ScanSummary> {
        if self.mode() == BotMode::Stopped {
            return Err(BotError::Precondition(
                "scan not allowed after stop".to_string(),
            ));
        }

        let scan = shared_scan(&self.inner);
        scan.await.map_err(BotError::from)
    }

    /// Buy a scanned token, sized in SOL
    pub async fn snipe(&self, token: &TokenScanResult, amount_sol: f64) -> TradeResult<String> {
        let order = BuyOrder::new(token.mint, &token.symbol, token.price_usd, amount_sol);
        self.execute_buy(&order).await
    }

    /// Execute a buy order through the trade coordinator
    pub async fn execute_buy(&self, order: &BuyOrder) -> TradeResult<String> {
        let transaction_id = self.inner.trader.execute_buy(order).await?;
        self.inner.triggered_buys.fetch_add(1, Ordering::SeqCst);
        Ok(transaction_id)
    }

    /// Sell an exact amount out of an open position
    pub async fn sell_position(&self, mint: &Pubkey, amount: f64) -> TradeResult<bool> {
        self.inner.trader.sell_position(mint, amount).await
    }

    /// Sell a percentage (0, 100] of an open position
    pub async fn sell_position_pct(&self, mint: &Pubkey, percentage: f64) -> TradeResult<bool> {
        self.inner.trader.sell_position_pct(mint, percentage).await
    }

    /// Tokens passing the configured low-risk view
    pub async fn low_risk_tokens(&self) -> Vec<TokenScanResult> {
        let sol_price_usd = match self.inner.wallet.sol_price_usd().await {
            Ok(price) => price,
            Err(err) => {
                warn!(%err, "SOL price unavailable, liquidity rule not applied");
                0.0
            }
        };
        let config = self.config();
        self.inner.scanner.low_risk_tokens(&config, sol_price_usd)
    }

    /// Point-in-time statistics snapshot
    pub fn stats(&self) -> SessionStats {
        let active_since = *self.inner.active_since.lock();
        let active_for = *self.inner.active_total.lock()
            + active_since.map_or(Duration::ZERO, |since| since.elapsed());

        SessionStats {
            scans_completed: self.inner.scans_completed.load(Ordering::SeqCst),
            rules_active: self.inner.config.read().active_rule_count(),
            success_rate: self.inner.transactions.success_rate(),
            triggered_buys: self.inner.triggered_buys.load(Ordering::SeqCst),
            active_for,
        }
    }

    fn spawn_scan_loop(&self) {
        let mut slot = self.inner.scan_loop.lock();
        if slot.is_some() {
            return;
        }

        let period = self.inner.config.read().scan_interval;
        let (interval_tx, mut interval_rx) = watch::channel(period);
        let inner = Arc::clone(&self.inner);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(*interval_rx.borrow());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if *inner.mode.read() != BotMode::Active {
                            break;
                        }
                        match shared_scan(&inner).await {
                            Ok(summary) => {
                                debug!(generation = summary.generation, "scheduled scan committed");
                            }
                            Err(ScanError::Stale { generation }) => {
                                debug!(generation, "scheduled scan superseded");
                            }
                            Err(err) => warn!(%err, "scheduled scan failed"),
                        }
                    }
                    changed = interval_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let period = *interval_rx.borrow();
                        // Restart the cadence from now; the next tick lands
                        // one full period out regardless of how much of the
                        // old period had elapsed.
                        ticker = tokio::time::interval_at(
                            tokio::time::Instant::now() + period,
                            period,
                        );
                        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                        debug!(?period, "scan loop rescheduled");
                    }
                }
            }
        });

        *slot = Some(ScanLoopHandle {
            handle,
            interval_tx,
        });
    }

    fn halt_scanning(&self) {
        if let Some(active_since) = self.inner.active_since.lock().take() {
            *self.inner.active_total.lock() += active_since.elapsed();
        }
        self.inner.scanner.invalidate();
        if let Some(scan_loop) = self.inner.scan_loop.lock().take() {
            scan_loop.handle.abort();
        }
    }
}

/// Join the in-flight scan cycle, or start one if none is outstanding.
///
/// Every caller of the returned future observes the same result; a driver
/// task keeps the cycle moving even if all callers drop.
fn shared_scan(inner: &Arc<BotInner>) -> SharedScan {
    let mut inflight = inner.inflight_scan.lock();
    if let Some(scan) = inflight.as_ref() {
        return scan.clone();
    }

    let owner = Arc::clone(inner);
    let scan: SharedScan = async move {
        let result = owner.scanner.run_cycle().await;
        if result.is_ok() {
            owner.scans_completed.fetch_add(1, Ordering::SeqCst);
            owner.positions.refresh(&owner.scanner.price_map());
        }
        owner.inflight_scan.lock().take();
        result
    }
    .boxed()
    .shared();

    *inflight = Some(scan.clone());
    tokio::spawn(scan.clone());
    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use solana_sniper_screening::{
        DiscoveredToken, RugReport, ScanEventBus, TokenLinks, TokenMetadataSource, Verification,
    };
    use solana_sniper_trading::TradeExecutionService;

    struct TestSource {
        tokens: Vec<DiscoveredToken>,
        delay: Duration,
        feed_calls: AtomicU64,
    }

    impl TestSource {
        fn new(delay: Duration) -> Self {
            let tokens = vec![DiscoveredToken {
                mint: Pubkey::new_unique(),
                symbol: "TEST".to_string(),
                name: "Test Token".to_string(),
                price_usd: 0.5,
                market_cap_usd: 500_000.0,
                links: TokenLinks::default(),
            }];
            Self {
                tokens,
                delay,
                feed_calls: AtomicU64::new(0),
            }
        }
    }

    #[async_trait]
    impl TokenMetadataSource for TestSource {
        async fn discovered_tokens(&self) -> Result<Vec<DiscoveredToken>> {
            self.feed_calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(self.tokens.clone())
        }

        async fn rug_report(&self, _mint: &Pubkey) -> Result<RugReport> {
            Ok(RugReport {
                score: 20,
                liquidity_usd: 60_000.0,
                verification: Some(Verification { verified: true }),
                top_holders: Vec::new(),
                risks: Vec::new(),
                is_rugged: false,
            })
        }
    }

    struct TestService {
        failing: AtomicBool,
    }

    impl TestService {
        fn new() -> Self {
            Self {
                failing: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl TradeExecutionService for TestService {
        async fn execute_buy(&self, _mint: &Pubkey, _amount_sol: f64) -> Result<String> {
            if self.failing.load(Ordering::SeqCst) {
                anyhow::bail!("venue rejected the swap");
            }
            Ok("buy-signature".to_string())
        }

        async fn execute_sell(&self, _mint: &Pubkey, _amount: f64) -> Result<String> {
            Ok("sell-signature".to_string())
        }
    }

    struct TestWallet {
        connected: AtomicBool,
    }

    impl TestWallet {
        fn new(connected: bool) -> Self {
            Self {
                connected: AtomicBool::new(connected),
            }
        }
    }

    #[async_trait]
    impl WalletSource for TestWallet {
        async fn is_connected(&self) -> bool {
            self.connected.load(Ordering::SeqCst)
        }

        async fn sol_balance(&self) -> Result<f64> {
            Ok(100.0)
        }

        async fn sol_price_usd(&self) -> Result<f64> {
            Ok(100.0)
        }
    }

    struct TestRig {
        bot: SniperBot,
        source: Arc<TestSource>,
        service: Arc<TestService>,
        wallet: Arc<TestWallet>,
    }

    fn rig_with(config: ScannerConfig, source_delay: Duration, wallet_connected: bool) -> TestRig {
        let source = Arc::new(TestSource::new(source_delay));
        let service = Arc::new(TestService::new());
        let wallet = Arc::new(TestWallet::new(wallet_connected));

        let scanner = Arc::new(ScannerEngine::new(
            Arc::clone(&source) as Arc<dyn TokenMetadataSource>,
            ScanEventBus::new(),
        ));
        let trader = Arc::new(TradeCoordinator::new(
            Arc::clone(&service) as Arc<dyn TradeExecutionService>,
            Arc::clone(&wallet) as Arc<dyn WalletSource>,
            Arc::new(PositionLedger::new()),
            Arc::new(TransactionHistory::new()),
        ));

        let bot = SniperBot::new(
            scanner,
            trader,
            Arc::clone(&wallet) as Arc<dyn WalletSource>,
            config,
        )
        .unwrap();

        TestRig {
            bot,
            source,
            service,
            wallet,
        }
    }

    fn manual_config() -> ScannerConfig {
        ScannerConfig {
            auto_scan: false,
            ..ScannerConfig::default()
        }
    }

    #[tokio::test]
    async fn initialization_requires_a_connected_wallet() {
        let rig = rig_with(manual_config(), Duration::ZERO, false);

        let err = rig.bot.initialize().await.unwrap_err();
        assert!(matches!(err, BotError::Initialization(_)));
        assert_eq!(rig.bot.mode(), BotMode::Idle);

        // The failure is retryable once the wallet comes up.
        rig.wallet.connected.store(true, Ordering::SeqCst);
        rig.bot.initialize().await.unwrap();

        rig.bot.start().unwrap();
        assert_eq!(rig.bot.mode(), BotMode::Active);
    }

    #[tokio::test]
    async fn start_requires_initialization() {
        let rig = rig_with(manual_config(), Duration::ZERO, true);

        let err = rig.bot.start().unwrap_err();

        assert!(matches!(err, BotError::Precondition(_)));
        assert_eq!(rig.bot.mode(), BotMode::Idle);
    }

    #[tokio::test]
    async fn lifecycle_transitions_are_enforced() {
        let rig = rig_with(manual_config(), Duration::ZERO, true);
        rig.bot.initialize().await.unwrap();

        assert!(matches!(rig.bot.pause(), Err(BotError::Precondition(_))));

        rig.bot.start().unwrap();
        rig.bot.pause().unwrap();
        assert_eq!(rig.bot.mode(), BotMode::Paused);

        // Paused sessions resume without re-initializing.
        rig.bot.start().unwrap();
        assert_eq!(rig.bot.mode(), BotMode::Active);

        rig.bot.stop();
        assert_eq!(rig.bot.mode(), BotMode::Stopped);
        assert!(matches!(rig.bot.start(), Err(BotError::Precondition(_))));
        assert!(matches!(
            rig.bot.trigger_manual_scan().await,
            Err(BotError::Precondition(_))
        ));
    }

    #[tokio::test]
    async fn rejected_config_updates_leave_the_old_config_in_place() {
        let rig = rig_with(manual_config(), Duration::ZERO, true);
        let before = rig.bot.config();

        let invalid = ScannerConfig {
            max_rug_score: 130,
            scan_interval: Duration::from_secs(3),
            ..ScannerConfig::default()
        };
        let err = rig.bot.update_scanner_config(invalid).unwrap_err();

        assert!(matches!(err, BotError::Validation(_)));
        assert_eq!(rig.bot.config(), before);
    }

    #[tokio::test]
    async fn valid_config_updates_replace_wholesale() {
        let rig = rig_with(manual_config(), Duration::ZERO, true);

        let updated = ScannerConfig {
            min_liquidity_sol: 12.0,
            scan_interval: Duration::from_secs(45),
            ..manual_config()
        };
        rig.bot.update_scanner_config(updated.clone()).unwrap();

        assert_eq!(rig.bot.config(), updated);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_manual_scans_share_one_cycle() {
        let rig = rig_with(manual_config(), Duration::from_millis(50), true);
        rig.bot.initialize().await.unwrap();
        rig.bot.start().unwrap();

        let (first, second) = tokio::join!(
            rig.bot.trigger_manual_scan(),
            rig.bot.trigger_manual_scan(),
        );

        let first = first.unwrap();
        let second = second.unwrap();
        assert_eq!(first.generation, second.generation);
        assert_eq!(rig.source.feed_calls.load(Ordering::SeqCst), 1);
        assert_eq!(rig.bot.stats().scans_completed, 1);

        // A later scan is a fresh cycle again.
        rig.bot.trigger_manual_scan().await.unwrap();
        assert_eq!(rig.source.feed_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn scans_in_flight_across_stop_cannot_mutate_stats() {
        let rig = rig_with(manual_config(), Duration::from_millis(50), true);
        rig.bot.initialize().await.unwrap();
        rig.bot.start().unwrap();

        let bot = rig.bot.clone();
        let in_flight = tokio::spawn(async move { bot.trigger_manual_scan().await });
        tokio::task::yield_now().await;

        rig.bot.stop();

        let result = in_flight.await.unwrap();
        assert!(matches!(
            result,
            Err(BotError::Scan(ScanError::Stale { .. }))
        ));
        assert_eq!(rig.bot.stats().scans_completed, 0);
        assert_eq!(rig.bot.scanner().tracked_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_scan_runs_on_schedule_and_stops_on_pause() {
        let config = ScannerConfig {
            auto_scan: true,
            scan_interval: Duration::from_secs(30),
            ..ScannerConfig::default()
        };
        let rig = rig_with(config, Duration::ZERO, true);
        rig.bot.initialize().await.unwrap();
        rig.bot.start().unwrap();

        // First cycle fires immediately, then one per interval.
        tokio::time::sleep(Duration::from_secs(65)).await;
        let after_a_minute = rig.bot.stats().scans_completed;
        assert!(after_a_minute >= 3, "expected ≥3 cycles, got {after_a_minute}");

        rig.bot.pause().unwrap();
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(rig.bot.stats().scans_completed, after_a_minute);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_updates_reschedule_the_loop() {
        let config = ScannerConfig {
            auto_scan: true,
            scan_interval: Duration::from_secs(300),
            ..ScannerConfig::default()
        };
        let rig = rig_with(config.clone(), Duration::ZERO, true);
        rig.bot.initialize().await.unwrap();
        rig.bot.start().unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        let baseline = rig.bot.stats().scans_completed;

        rig.bot
            .update_scanner_config(ScannerConfig {
                scan_interval: Duration::from_secs(15),
                ..config
            })
            .unwrap();

        tokio::time::sleep(Duration::from_secs(50)).await;
        let rescheduled = rig.bot.stats().scans_completed;
        assert!(
            rescheduled >= baseline + 3,
            "expected ≥3 cycles after reschedule, got {rescheduled} from {baseline}"
        );
    }

    #[tokio::test]
    async fn stats_derive_from_trading_outcomes() {
        let rig = rig_with(manual_config(), Duration::ZERO, true);
        rig.bot.initialize().await.unwrap();
        rig.bot.start().unwrap();
        rig.bot.trigger_manual_scan().await.unwrap();

        let token = rig.bot.scanner().tokens().pop().unwrap();
        rig.bot.snipe(&token, 1.0).await.unwrap();

        rig.service.failing.store(true, Ordering::SeqCst);
        let other = DiscoveredToken {
            mint: Pubkey::new_unique(),
            symbol: "OTHR".to_string(),
            name: "Other".to_string(),
            price_usd: 1.0,
            market_cap_usd: 1_000_000.0,
            links: TokenLinks::default(),
        };
        let order = BuyOrder::new(other.mint, &other.symbol, other.price_usd, 1.0);
        assert!(rig.bot.execute_buy(&order).await.is_err());

        let stats = rig.bot.stats();
        assert_eq!(stats.triggered_buys, 1);
        assert_eq!(stats.scans_completed, 1);
        assert!((stats.success_rate - 0.5).abs() < 1e-12);
        assert_eq!(stats.rules_active, 3);
        assert!(stats.active_for > Duration::ZERO);
    }

    #[tokio::test]
    async fn stopping_releases_event_subscriptions() {
        let rig = rig_with(manual_config(), Duration::ZERO, true);
        let bus = Arc::clone(rig.bot.scanner().events());
        let _token = bus.subscribe(
            solana_sniper_screening::ScanTopic::ScanComplete,
            |_| {},
        );
        assert_eq!(
            bus.subscriber_count(solana_sniper_screening::ScanTopic::ScanComplete),
            1
        );

        rig.bot.stop();

        assert_eq!(
            bus.subscriber_count(solana_sniper_screening::ScanTopic::ScanComplete),
            0
        );
    }
}
