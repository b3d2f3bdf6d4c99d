use console::style;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use solana_sniper_core::SessionStats;
use solana_sniper_portfolio::{Position, TransactionRecord};
use solana_sniper_screening::TokenScanResult;

#[derive(Tabled)]
struct TokenRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Price $")]
    price: String,
    #[tabled(rename = "MCap $")]
    market_cap: String,
    #[tabled(rename = "Liq $")]
    liquidity: String,
    #[tabled(rename = "Rug")]
    rug_score: u8,
    #[tabled(rename = "Top %")]
    top_holder: String,
    #[tabled(rename = "Verified")]
    verified: String,
    #[tabled(rename = "High risk")]
    high_risk: String,
}

impl From<&TokenScanResult> for TokenRow {
    fn from(token: &TokenScanResult) -> Self {
        Self {
            symbol: token.symbol.clone(),
            price: format!("{:.6}", token.price_usd),
            market_cap: format!("{:.0}", token.market_cap_usd),
            liquidity: format!("{:.0}", token.liquidity_usd),
            rug_score: token.rug_score,
            top_holder: format!("{:.1}", token.top_holder_pct),
            verified: yes_no(token.is_verified),
            high_risk: yes_no(token.is_high_risk),
        }
    }
}

#[derive(Tabled)]
struct PositionRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Cost $")]
    cost_basis: String,
    #[tabled(rename = "Value $")]
    current_value: String,
    #[tabled(rename = "PnL $")]
    pnl: String,
    #[tabled(rename = "Bought")]
    buy_time: String,
}

impl From<&Position> for PositionRow {
    fn from(position: &Position) -> Self {
        Self {
            symbol: position.symbol.clone(),
            amount: format!("{:.4}", position.amount),
            cost_basis: format!("{:.6}", position.cost_basis),
            current_value: format!("{:.2}", position.current_value),
            pnl: format!("{:+.2}", position.unrealized_pnl()),
            buy_time: position.buy_time.format("%H:%M:%S").to_string(),
        }
    }
}

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Details")]
    details: String,
}

impl From<&TransactionRecord> for TransactionRow {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            time: record.timestamp.format("%H:%M:%S").to_string(),
            symbol: record.symbol.clone(),
            status: format!("{:?}", record.status),
            details: record.details.clone(),
        }
    }
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

fn print_table<R: Tabled>(title: &str, rows: Vec<R>) {
    println!("\n{}", style(title).bold());
    if rows.is_empty() {
        println!("{}", style("  (none)").dim());
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

/// Render a token table under a styled title
pub fn render_tokens(title: &str, tokens: &[TokenScanResult]) {
    print_table(title, tokens.iter().map(TokenRow::from).collect());
}

/// Render the open positions table
pub fn render_positions(positions: &[Position]) {
    print_table("Open positions", positions.iter().map(PositionRow::from).collect());
}

/// Render the transaction log table
pub fn render_transactions(records: &[TransactionRecord]) {
    print_table("Transactions", records.iter().map(TransactionRow::from).collect());
}

/// Render the session statistics block
pub fn render_stats(stats: &SessionStats) {
    println!("\n{}", style("Session").bold());
    println!("  {} {}", style("Scans completed:").bold(), stats.scans_completed);
    println!("  {} {}", style("Rules active:").bold(), stats.rules_active);
    println!("  {} {}", style("Triggered buys:").bold(), stats.triggered_buys);
    println!(
        "  {} {:.1}%",
        style("Success rate:").bold(),
        stats.success_rate * 100.0
    );
    println!(
        "  {} {:.1}s",
        style("Active for:").bold(),
        stats.active_for.as_secs_f64()
    );
}
