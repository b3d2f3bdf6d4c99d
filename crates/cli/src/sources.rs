//! Simulated collaborators so the bot runs end-to-end without network
//! access: a discovery feed minting random tokens, a trade venue with
//! injectable failures, and a wallet with a fixed SOL price.
//!
//! Rug reports are generated once per mint and then served unchanged, so
//! re-scanning a mint classifies identically.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use solana_sdk::pubkey::Pubkey;
use uuid::Uuid;

use solana_sniper_screening::{
    DiscoveredToken, HolderShare, RugReport, TokenLinks, TokenMetadataSource, Verification,
};
use solana_sniper_trading::{TradeExecutionService, WalletSource};

use crate::config::SimulationConfig;

const SYMBOLS: &[&str] = &[
    "BONK", "WIF", "MOON", "PEPE", "SNIPE", "GIGA", "FROG", "CHAD", "PUMP", "WAGMI",
];

/// Cap on how many tokens the simulated feed keeps visible
const FEED_WINDOW: usize = 48;

/// Discovery feed minting a few random tokens per call
pub struct SimulatedMetadataSource {
    config: SimulationConfig,
    state: Mutex<FeedState>,
}

struct FeedState {
    rng: StdRng,
    universe: Vec<DiscoveredToken>,
    reports: HashMap<Pubkey, RugReport>,
}

impl SimulatedMetadataSource {
    pub fn new(config: SimulationConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            state: Mutex::new(FeedState {
                rng,
                universe: Vec::new(),
                reports: HashMap::new(),
            }),
        }
    }

    fn mint_listing(state: &mut FeedState) -> DiscoveredToken {
        let rng = &mut state.rng;
        let symbol = SYMBOLS[rng.gen_range(0..SYMBOLS.len())].to_string();
        let price_usd = rng.gen_range(0.00002..0.02);
        let market_cap_usd = rng.gen_range(20_000.0..5_000_000.0);

        let links = TokenLinks {
            website: rng
                .gen_bool(0.6)
                .then(|| format!("https://{}.example.com", symbol.to_lowercase())),
            twitter: rng
                .gen_bool(0.5)
                .then(|| format!("https://twitter.com/{}", symbol.to_lowercase())),
            telegram: rng
                .gen_bool(0.4)
                .then(|| format!("https://t.me/{}", symbol.to_lowercase())),
        };

        let token = DiscoveredToken {
            mint: Pubkey::new_unique(),
            name: format!("{symbol} Token"),
            symbol,
            price_usd,
            market_cap_usd,
            links,
        };

        let report = RugReport {
            score: rng.gen_range(0..=100),
            liquidity_usd: rng.gen_range(0.0..400_000.0),
            verification: Some(Verification {
                verified: rng.gen_bool(0.4),
            }),
            top_holders: vec![HolderShare {
                address: Pubkey::new_unique(),
                percentage: rng.gen_range(2.0..95.0),
            }],
            risks: Vec::new(),
            is_rugged: rng.gen_bool(0.03),
        };
        state.reports.insert(token.mint, report);

        token
    }
}

#[async_trait]
impl TokenMetadataSource for SimulatedMetadataSource {
    async fn discovered_tokens(&self) -> Result<Vec<DiscoveredToken>> {
        let mut state = self.state.lock();
        for _ in 0..self.config.tokens_per_scan {
            let listing = Self::mint_listing(&mut state);
            state.universe.push(listing);
        }
        // Old listings fall off the feed, like a real aggregator page.
        while state.universe.len() > FEED_WINDOW {
            let stale = state.universe.remove(0);
            state.reports.remove(&stale.mint);
        }
        Ok(state.universe.clone())
    }

    async fn rug_report(&self, mint: &Pubkey) -> Result<RugReport> {
        let mut state = self.state.lock();
        if state.rng.gen::<f64>() < self.config.lookup_failure_rate {
            bail!("risk service timed out");
        }
        state
            .reports
            .get(mint)
            .cloned()
            .ok_or_else(|| anyhow!("unknown mint {mint}"))
    }
}

/// Trade venue with configurable latency and failure injection
pub struct SimulatedTradeService {
    failure_rate: f64,
    latency: Duration,
    rng: Mutex<StdRng>,
}

impl SimulatedTradeService {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            failure_rate: config.trade_failure_rate,
            latency: Duration::from_millis(config.trade_latency_ms),
            rng: Mutex::new(StdRng::seed_from_u64(config.seed.wrapping_add(1))),
        }
    }

    fn roll_failure(&self) -> bool {
        self.rng.lock().gen::<f64>() < self.failure_rate
    }
}

#[async_trait]
impl TradeExecutionService for SimulatedTradeService {
    async fn execute_buy(&self, _mint: &Pubkey, _amount_sol: f64) -> Result<String> {
        tokio::time::sleep(self.latency).await;
        if self.roll_failure() {
            bail!("slippage tolerance exceeded");
        }
        Ok(format!("SIM{}", Uuid::new_v4().simple()))
    }

    async fn execute_sell(&self, _mint: &Pubkey, _token_amount: f64) -> Result<String> {
        tokio::time::sleep(self.latency).await;
        if self.roll_failure() {
            bail!("slippage tolerance exceeded");
        }
        Ok(format!("SIM{}", Uuid::new_v4().simple()))
    }
}

/// Wallet with a fixed balance and SOL price
pub struct SimulatedWallet {
    connected: AtomicBool,
    balance_sol: f64,
    sol_price_usd: f64,
}

impl SimulatedWallet {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            connected: AtomicBool::new(true),
            balance_sol: config.wallet_balance_sol,
            sol_price_usd: config.sol_price_usd,
        }
    }

    /// Simulate the provider dropping the connection
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

#[async_trait]
impl WalletSource for SimulatedWallet {
    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn sol_balance(&self) -> Result<f64> {
        Ok(self.balance_sol)
    }

    async fn sol_price_usd(&self) -> Result<f64> {
        Ok(self.sol_price_usd)
    }
}
