//! Pricing components.
//!
//! - Rolling historical volatility estimation
//! - Black-Scholes valuation of single legs
//! - Vertical spread strike selection and credit quoting

pub mod black_scholes;
pub mod spread;
pub mod volatility;

pub use black_scholes::{BlackScholes, PricingError};
pub use spread::{
    SpreadPricer, SpreadQuote, StrikePair, CONTRACT_MULTIPLIER, SPREAD_WIDTH, WIDTH_COLLATERAL,
};
pub use volatility::{VolatilityEstimator, TRADING_DAYS_PER_YEAR};
