//! # Run a backtest
//! spread-backtest --data data/aapl.csv
//!
//! # With custom parameters
//! spread-backtest --data data/aapl.csv --config config/default.toml

use std::fs;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use spread_backtest::{load_csv, BacktestConfig, BacktestEngine};

#[derive(Parser)]
#[command(name = "spread-backtest")]
#[command(about = "Black-Scholes credit spread backtester driven by RSI signals")]
#[command(version)]
struct Cli {
    /// CSV file with date,close,rsi rows
    #[arg(short, long)]
    data: String,

    /// Optional TOML file overriding the default backtest parameters
    #[arg(short, long)]
    config: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config file {path}"))?;
            toml::from_str::<BacktestConfig>(&raw)
                .with_context(|| format!("parsing config file {path}"))?
        }
        None => BacktestConfig::default(),
    };

    let series = load_csv(&cli.data).with_context(|| format!("loading series from {}", cli.data))?;
    let report = BacktestEngine::new(config).run(&series);

    for trade in &report.trades {
        println!(
            "Sold credit {} spread at {},{} on {} for ${} credit -> {:?} of ${} at {} expiration",
            trade.direction,
            trade.near_strike,
            trade.far_strike,
            trade.entry_date,
            trade.credit_received,
            trade.outcome,
            trade.realized_pnl,
            trade.expiration_date,
        );
    }

    println!("{}", report.summary());
    Ok(())
}
