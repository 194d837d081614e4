//! Vertical credit spread construction and theoretical pricing.
//!
//! The short leg is struck roughly 3% out of the money, rounded onto the
//! $10 strike grid; the protective long leg sits $5 further out. Both legs
//! are valued with the same volatility and expiry, and the credit is the
//! difference of the two leg prices.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::data::OptionType;

use super::black_scholes::{BlackScholes, PricingError};

/// Distance between the short and long strike, in dollars.
pub const SPREAD_WIDTH: i64 = 5;

/// Shares per option contract.
pub const CONTRACT_MULTIPLIER: i64 = 100;

/// Collateral per contract, equal to the full-width loss: width x multiplier.
pub const WIDTH_COLLATERAL: i64 = SPREAD_WIDTH * CONTRACT_MULTIPLIER;

/// Strike grid the short leg is rounded onto.
const STRIKE_GRID: f64 = 10.0;

/// Fraction the short strike sits out of the money.
const OTM_OFFSET: f64 = 0.03;

/// The two strikes of a vertical spread. `near` is the short leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrikePair {
    pub near: Decimal,
    pub far: Decimal,
}

/// A priced vertical credit spread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpreadQuote {
    pub direction: OptionType,
    /// Short leg strike, closer to spot.
    pub near_strike: Decimal,
    /// Protective long leg strike, further out of the money.
    pub far_strike: Decimal,
    /// Theoretical credit per share, rounded to cents.
    pub credit: Decimal,
}

/// Prices vertical credit spreads off a Black-Scholes model.
#[derive(Debug, Clone, Copy)]
pub struct SpreadPricer {
    bs: BlackScholes,
}

impl SpreadPricer {
    pub fn new(bs: BlackScholes) -> Self {
        Self { bs }
    }

    /// Select the strikes for a spread around `spot`.
    ///
    /// Grid rounding is to the nearest multiple of $10 with ties away from
    /// zero, so a $105.00 target strikes at $110.
    pub fn strikes(direction: OptionType, spot: f64) -> StrikePair {
        let width = Decimal::from(SPREAD_WIDTH);
        match direction {
            OptionType::Call => {
                let near = round_to_grid(spot * (1.0 + OTM_OFFSET));
                StrikePair {
                    near,
                    far: near + width,
                }
            }
            OptionType::Put => {
                let near = round_to_grid(spot * (1.0 - OTM_OFFSET));
                StrikePair {
                    near,
                    far: near - width,
                }
            }
        }
    }

    /// Price both legs at the same sigma/expiry and quote the net credit.
    pub fn quote(
        &self,
        direction: OptionType,
        spot: Decimal,
        time: f64,
        sigma: f64,
    ) -> Result<SpreadQuote, PricingError> {
        let spot_f: f64 = spot
            .try_into()
            .map_err(|_| PricingError::InvalidInput("spot not representable as f64"))?;

        let pair = Self::strikes(direction, spot_f);
        let near_f: f64 = pair.near.try_into().unwrap_or(0.0);
        let far_f: f64 = pair.far.try_into().unwrap_or(0.0);

        let near_price = self.bs.price(spot_f, near_f, time, sigma, direction)?;
        let far_price = self.bs.price(spot_f, far_f, time, sigma, direction)?;

        let credit = Decimal::try_from(near_price - far_price)
            .map_err(|_| PricingError::InvalidInput("credit not representable"))?
            .round_dp(2);

        Ok(SpreadQuote {
            direction,
            near_strike: pair.near,
            far_strike: pair.far,
            credit,
        })
    }
}

fn round_to_grid(x: f64) -> Decimal {
    Decimal::from(((x / STRIKE_GRID).round() * STRIKE_GRID) as i64)
}
