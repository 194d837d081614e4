//! Core backtest engine.
//!
//! Single pass over the series:
//! 1. Estimate rolling volatility once.
//! 2. Classify each day's RSI into a signal.
//! 3. Filter candidates to the tradable spot band and the per-side cap.
//! 4. Resolve the expiration, price the spread, settle the outcome.
//! 5. Aggregate the trade log into a report.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::data::{MarketSeries, OptionType};
use crate::pricing::{
    BlackScholes, PricingError, SpreadPricer, VolatilityEstimator, TRADING_DAYS_PER_YEAR,
    WIDTH_COLLATERAL,
};
use crate::signal::{SignalGenerator, SignalKind};

use super::expiration::{ExpirationResolver, NoExpirationFound};
use super::trade::Trade;

/// Configuration for a backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Annualized risk-free rate.
    pub rate: f64,

    /// Time to expiry used for pricing, as a year fraction.
    pub time_to_expiry: f64,

    /// Rolling window for volatility estimation, in trading days.
    pub volatility_window: usize,

    /// RSI level above which call spreads are sold.
    pub rsi_overbought: f64,

    /// RSI level below which put spreads are sold.
    pub rsi_oversold: f64,

    /// Lower bound of the tradable spot band (exclusive).
    pub min_spot: Decimal,

    /// Upper bound of the tradable spot band (exclusive).
    pub max_spot: Decimal,

    /// Candidate cap per side; calls and puts are counted separately.
    pub max_trades_per_side: usize,

    /// Calendar days from entry to the expiration target.
    pub expiration_target_days: i64,

    /// How far past the target the expiration scan may run.
    pub expiration_scan_bound_days: i64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            rate: 0.01,
            time_to_expiry: 1.0 / 12.0,
            volatility_window: TRADING_DAYS_PER_YEAR,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            min_spot: Decimal::from(100),
            max_spot: Decimal::from(200),
            max_trades_per_side: 15,
            expiration_target_days: 30,
            expiration_scan_bound_days: 14,
        }
    }
}

/// Why a single candidate was dropped. Always recovered locally: the
/// candidate is excluded from the report and the run continues.
#[derive(Error, Debug)]
pub enum CandidateError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Expiration(#[from] NoExpirationFound),

    #[error("no close price listed for expiration {0}")]
    MissingExpirationPrice(NaiveDate),
}

/// Result of a completed backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Settled trades in entry-date order.
    pub trades: Vec<Trade>,

    /// Exact sum of realized trade P&Ls.
    pub total_pnl: Decimal,

    /// Width collateral held across all trades: trade count x $500.
    pub total_collateral: Decimal,
}

impl BacktestReport {
    fn from_trades(trades: Vec<Trade>) -> Self {
        let total_pnl = trades.iter().map(|t| t.realized_pnl).sum();
        let total_collateral =
            Decimal::from(WIDTH_COLLATERAL) * Decimal::from(trades.len() as i64);
        Self {
            trades,
            total_pnl,
            total_collateral,
        }
    }

    pub fn winning_trades(&self) -> usize {
        self.trades.iter().filter(|t| t.is_winner()).count()
    }

    pub fn losing_trades(&self) -> usize {
        self.trades.len() - self.winning_trades()
    }

    /// Calculate win rate.
    pub fn win_rate(&self) -> f64 {
        if self.trades.is_empty() {
            return 0.0;
        }
        self.winning_trades() as f64 / self.trades.len() as f64
    }

    /// Total credit received across all trades.
    pub fn total_credit(&self) -> Decimal {
        self.trades.iter().map(|t| t.credit_received).sum()
    }

    /// Generate summary string.
    pub fn summary(&self) -> String {
        if self.trades.is_empty() {
            return "Backtest Results: no trades taken".to_string();
        }

        format!(
            "Backtest Results ({} to {})\n\
             ----------------------------------------\n\
             Trades: {} (W: {}, L: {})\n\
             Win Rate: {:.1}%\n\
             Total Credit: ${:.2}\n\
             Total P&L: ${:.2}\n\
             Collateral: ${:.2}",
            self.trades[0].entry_date,
            self.trades[self.trades.len() - 1].entry_date,
            self.trades.len(),
            self.winning_trades(),
            self.losing_trades(),
            self.win_rate() * 100.0,
            self.total_credit(),
            self.total_pnl,
            self.total_collateral,
        )
    }
}

/// The backtest engine.
///
/// Holds its pricing collaborators by composition: a spread pricer built
/// on Black-Scholes, a volatility estimator, and a signal generator.
pub struct BacktestEngine {
    config: BacktestConfig,
    pricer: SpreadPricer,
    estimator: VolatilityEstimator,
    signals: SignalGenerator,
}

impl BacktestEngine {
    pub fn new(config: BacktestConfig) -> Self {
        let pricer = SpreadPricer::new(BlackScholes::new(config.rate));
        let estimator = VolatilityEstimator::new(config.volatility_window);
        let signals = SignalGenerator::new(config.rsi_overbought, config.rsi_oversold);
        Self {
            config,
            pricer,
            estimator,
            signals,
        }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Run the backtest over a validated series.
    ///
    /// Per-candidate failures (undefined volatility, pricing rejection,
    /// unresolvable expiration) drop that candidate and continue; the
    /// report covers every candidate that settled cleanly.
    pub fn run(&self, series: &MarketSeries) -> BacktestReport {
        let sigmas = self.estimator.estimate(&series.closes());
        let resolver = ExpirationResolver::new(
            series,
            self.config.expiration_target_days,
            self.config.expiration_scan_bound_days,
        );

        let mut trades = Vec::new();
        let mut call_candidates = 0usize;
        let mut put_candidates = 0usize;

        for (idx, record) in series.records().iter().enumerate() {
            let direction = match self.signals.classify(record.rsi) {
                SignalKind::Overbought => OptionType::Call,
                SignalKind::Oversold => OptionType::Put,
                SignalKind::Neutral => continue,
            };

            if record.close <= self.config.min_spot || record.close >= self.config.max_spot {
                continue;
            }

            // Qualifying candidates consume a slot whether or not they
            // settle: the cap samples the first N per side.
            let taken = match direction {
                OptionType::Call => &mut call_candidates,
                OptionType::Put => &mut put_candidates,
            };
            if *taken >= self.config.max_trades_per_side {
                continue;
            }
            *taken += 1;

            match self.settle_candidate(series, &sigmas, &resolver, idx, direction) {
                Ok(trade) => {
                    debug!(
                        date = %trade.entry_date,
                        %direction,
                        near = %trade.near_strike,
                        far = %trade.far_strike,
                        credit = %trade.credit_received,
                        "entered spread"
                    );
                    trades.push(trade);
                }
                Err(err) => {
                    debug!(date = %record.date, %direction, error = %err, "dropped candidate");
                }
            }
        }

        info!(trades = trades.len(), "backtest complete");
        BacktestReport::from_trades(trades)
    }

    fn settle_candidate(
        &self,
        series: &MarketSeries,
        sigmas: &[Option<f64>],
        resolver: &ExpirationResolver<'_>,
        idx: usize,
        direction: OptionType,
    ) -> Result<Trade, CandidateError> {
        let record = &series.records()[idx];

        let sigma = sigmas[idx].ok_or(PricingError::InsufficientHistory(idx))?;
        let expiration = resolver.resolve(record.date)?;
        let spot_at_expiration = series
            .close_at(expiration)
            .ok_or(CandidateError::MissingExpirationPrice(expiration))?;

        let quote =
            self.pricer
                .quote(direction, record.close, self.config.time_to_expiry, sigma)?;

        Ok(Trade::settle(
            &quote,
            record.date,
            expiration,
            record.close,
            spot_at_expiration,
        ))
    }
}
