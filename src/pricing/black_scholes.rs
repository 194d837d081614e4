//! Black-Scholes valuation of European options.
//!
//! Pure, deterministic pricing off daily closes: no dividend term, no
//! Greeks, no implied-vol solving. The backtest only needs theoretical
//! leg values at entry.

use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::data::OptionType;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("invalid pricing input: {0}")]
    InvalidInput(&'static str),

    #[error("volatility undefined at index {0}: insufficient history")]
    InsufficientHistory(usize),
}

/// Black-Scholes calculator for European option prices.
#[derive(Debug, Clone, Copy)]
pub struct BlackScholes {
    /// Annualized risk-free interest rate.
    pub rate: f64,
}

impl BlackScholes {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// Calculate d1 parameter.
    fn d1(&self, spot: f64, strike: f64, time: f64, vol: f64) -> f64 {
        let numerator = (spot / strike).ln() + (self.rate + 0.5 * vol * vol) * time;
        numerator / (vol * time.sqrt())
    }

    /// Calculate d2 parameter.
    fn d2(&self, spot: f64, strike: f64, time: f64, vol: f64) -> f64 {
        self.d1(spot, strike, time, vol) - vol * time.sqrt()
    }

    /// Standard normal CDF.
    fn norm_cdf(x: f64) -> f64 {
        let normal = Normal::new(0.0, 1.0).unwrap();
        normal.cdf(x)
    }

    fn validate(spot: f64, strike: f64, time: f64, vol: f64) -> Result<(), PricingError> {
        if vol <= 0.0 {
            return Err(PricingError::InvalidInput("volatility must be positive"));
        }
        if time <= 0.0 {
            return Err(PricingError::InvalidInput("time to expiry must be positive"));
        }
        if spot <= 0.0 || strike <= 0.0 {
            return Err(PricingError::InvalidInput("spot and strike must be positive"));
        }
        Ok(())
    }

    /// Calculate call option price.
    pub fn call_price(
        &self,
        spot: f64,
        strike: f64,
        time: f64,
        vol: f64,
    ) -> Result<f64, PricingError> {
        Self::validate(spot, strike, time, vol)?;

        let d1 = self.d1(spot, strike, time, vol);
        let d2 = self.d2(spot, strike, time, vol);

        Ok(spot * Self::norm_cdf(d1) - strike * (-self.rate * time).exp() * Self::norm_cdf(d2))
    }

    /// Calculate put option price.
    pub fn put_price(
        &self,
        spot: f64,
        strike: f64,
        time: f64,
        vol: f64,
    ) -> Result<f64, PricingError> {
        Self::validate(spot, strike, time, vol)?;

        let d1 = self.d1(spot, strike, time, vol);
        let d2 = self.d2(spot, strike, time, vol);

        Ok(strike * (-self.rate * time).exp() * Self::norm_cdf(-d2) - spot * Self::norm_cdf(-d1))
    }

    /// Calculate option price based on type.
    pub fn price(
        &self,
        spot: f64,
        strike: f64,
        time: f64,
        vol: f64,
        opt_type: OptionType,
    ) -> Result<f64, PricingError> {
        match opt_type {
            OptionType::Call => self.call_price(spot, strike, time, vol),
            OptionType::Put => self.put_price(spot, strike, time, vol),
        }
    }
}
