//! Command line interface for the Solana sniper bot
//!
//! Wires the session controller to simulated collaborators:
//! - `run` keeps the bot scanning (and optionally sniping) until Ctrl+C
//! - `scan` initializes the session and runs a single cycle
//! - `generate-config` writes a default JSON configuration

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use solana_sniper_core::SniperBot;
use solana_sniper_portfolio::{PositionLedger, TransactionHistory};
use solana_sniper_screening::{
    ScanEvent, ScanEventBus, ScanTopic, ScannerEngine, TokenMetadataSource,
};
use solana_sniper_trading::{TradeCoordinator, TradeExecutionService, WalletSource};

mod config;
mod display;
mod sources;

use config::AppConfig;
use sources::{SimulatedMetadataSource, SimulatedTradeService, SimulatedWallet};

/// Solana sniper bot CLI
#[derive(Parser, Debug)]
#[clap(name = "solana-sniper-bot", version, about, long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[clap(short, long, value_name = "FILE", default_value = "sniper.json")]
    config: PathBuf,

    /// Sets log level
    #[clap(short, long, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Subcommand to execute
    #[clap(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bot until interrupted
    Run,

    /// Initialize the session and run a single scan cycle
    Scan,

    /// Generate a default configuration
    GenerateConfig {
        /// Output file
        #[clap(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(&cli.log_level);

    if let Commands::GenerateConfig { output } = &cli.command {
        AppConfig::default().save(output)?;
        println!("Configuration written to {}", output.display());
        return Ok(());
    }

    let app = if cli.config.exists() {
        info!("loading configuration from {}", cli.config.display());
        AppConfig::from_file(&cli.config)?
    } else {
        warn!(
            "config file {} not found, using defaults",
            cli.config.display()
        );
        AppConfig::default()
    };

    let bot = build_bot(&app)?;

    match cli.command {
        Commands::Run => run(bot, &app).await,
        Commands::Scan => scan_once(bot).await,
        Commands::GenerateConfig { .. } => unreachable!("handled above"),
    }
}

/// Initialize logging with the specified level
fn initialize_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

/// Assemble the session over simulated collaborators
fn build_bot(app: &AppConfig) -> Result<SniperBot> {
    let source = Arc::new(SimulatedMetadataSource::new(app.simulation.clone()));
    let wallet = Arc::new(SimulatedWallet::new(&app.simulation));
    let service = Arc::new(SimulatedTradeService::new(&app.simulation));

    let scanner = Arc::new(ScannerEngine::new(
        source as Arc<dyn TokenMetadataSource>,
        ScanEventBus::new(),
    ));
    let trader = Arc::new(TradeCoordinator::new(
        service as Arc<dyn TradeExecutionService>,
        Arc::clone(&wallet) as Arc<dyn WalletSource>,
        Arc::new(PositionLedger::new()),
        Arc::new(TransactionHistory::with_limit(app.history_limit)),
    ));

    let bot = SniperBot::new(
        scanner,
        trader,
        wallet as Arc<dyn WalletSource>,
        app.scanner.clone(),
    )?;
    Ok(bot)
}

/// Run the bot until Ctrl+C
async fn run(bot: SniperBot, app: &AppConfig) -> Result<()> {
    bot.initialize().await?;

    let events = Arc::clone(bot.scanner().events());

    let _discovery_log = events.subscribe(ScanTopic::NewToken, |event| {
        if let ScanEvent::NewToken(token) = event {
            info!(
                symbol = %token.symbol,
                rug_score = token.rug_score,
                high_risk = token.is_high_risk,
                "token discovered"
            );
        }
    });

    // Auto-snipe: after each committed cycle, buy low-risk discoveries
    // that are not already held.
    let sniper_sub = if app.auto_buy {
        let bot = bot.clone();
        let amount_sol = app.buy_amount_sol;
        Some(events.subscribe(ScanTopic::ScanComplete, move |_| {
            let bot = bot.clone();
            tokio::spawn(async move {
                for token in bot.low_risk_tokens().await {
                    if bot.positions().get(&token.mint).is_some() {
                        continue;
                    }
                    match bot.snipe(&token, amount_sol).await {
                        Ok(transaction_id) => {
                            info!(symbol = %token.symbol, %transaction_id, "sniped")
                        }
                        Err(err) => warn!(symbol = %token.symbol, %err, "snipe skipped"),
                    }
                }
            });
        }))
    } else {
        None
    };

    bot.start()?;

    let status_bot = bot.clone();
    let status_log = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(30));
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let stats = status_bot.stats();
            info!(
                scans = stats.scans_completed,
                positions = status_bot.positions().len(),
                success_rate = stats.success_rate,
                "session status"
            );
        }
    });

    println!("Press Ctrl+C to stop the bot");
    tokio::signal::ctrl_c().await?;

    status_log.abort();
    if let Some(subscription) = &sniper_sub {
        subscription.unsubscribe();
    }
    bot.stop();

    display::render_stats(&bot.stats());
    display::render_positions(&bot.positions().positions());
    display::render_transactions(&bot.transactions().snapshot());
    Ok(())
}

/// Initialize and run one manual scan cycle
async fn scan_once(bot: SniperBot) -> Result<()> {
    bot.initialize().await?;

    let summary = bot.trigger_manual_scan().await?;
    info!(
        tokens = summary.tokens_scanned,
        new = summary.new_tokens,
        took_ms = summary.duration_ms,
        "scan complete"
    );

    display::render_tokens("Scanned tokens", &bot.scanner().tokens());
    display::render_tokens("Low-risk view", &bot.low_risk_tokens().await);
    Ok(())
}
