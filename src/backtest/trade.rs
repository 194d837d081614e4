//! Trade records and expiration settlement.
//!
//! A trade is created fully settled: entry pricing and the expiration
//! outcome are computed in one step, and the record is never mutated
//! afterward.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::data::OptionType;
use crate::pricing::{SpreadQuote, CONTRACT_MULTIPLIER, WIDTH_COLLATERAL};

/// How the spread finished at expiration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeOutcome {
    /// Short leg expired out of the money; full credit kept.
    Profit,
    /// Short leg breached; credit reduced by the full spread width.
    Loss,
}

/// One settled vertical credit spread trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub direction: OptionType,
    pub spot_at_entry: Decimal,
    pub spot_at_expiration: Decimal,
    /// Short leg strike.
    pub near_strike: Decimal,
    /// Protective long leg strike.
    pub far_strike: Decimal,
    /// Credit per contract: per-share credit x 100.
    pub credit_received: Decimal,
    pub outcome: TradeOutcome,
    pub realized_pnl: Decimal,
}

impl Trade {
    /// Build a settled trade from an entry quote and the expiration close.
    ///
    /// Profit means the short leg stayed out of the money. A loss realizes
    /// the credit minus the full $500 width: the vertical's max loss,
    /// applied regardless of how far in the money the spread finished, and
    /// not floored at zero even when the credit was small.
    pub fn settle(
        quote: &SpreadQuote,
        entry_date: NaiveDate,
        expiration_date: NaiveDate,
        spot_at_entry: Decimal,
        spot_at_expiration: Decimal,
    ) -> Self {
        let credit_received = quote.credit * Decimal::from(CONTRACT_MULTIPLIER);

        let stays_otm = match quote.direction {
            OptionType::Call => quote.near_strike > spot_at_expiration,
            OptionType::Put => quote.near_strike < spot_at_expiration,
        };

        let (outcome, realized_pnl) = if stays_otm {
            (TradeOutcome::Profit, credit_received)
        } else {
            (
                TradeOutcome::Loss,
                credit_received - Decimal::from(WIDTH_COLLATERAL),
            )
        };

        Self {
            entry_date,
            expiration_date,
            direction: quote.direction,
            spot_at_entry,
            spot_at_expiration,
            near_strike: quote.near_strike,
            far_strike: quote.far_strike,
            credit_received,
            outcome,
            realized_pnl,
        }
    }

    /// Check if the trade was profitable.
    pub fn is_winner(&self) -> bool {
        self.outcome == TradeOutcome::Profit
    }
}
