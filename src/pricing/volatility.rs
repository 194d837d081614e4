//! Rolling historical volatility from daily closes.

use rust_decimal::Decimal;

/// Trading days per year; also the default estimation window.
pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// Rolling annualized standard deviation of daily log returns.
///
/// `sigma_i` is the sample standard deviation (n-1 denominator) of the
/// trailing `window` log returns ending at index `i`, scaled by
/// `sqrt(252)`. Indices with fewer than `window` prior observations are
/// undefined and must not be priced against.
#[derive(Debug, Clone, Copy)]
pub struct VolatilityEstimator {
    window: usize,
}

impl Default for VolatilityEstimator {
    fn default() -> Self {
        Self {
            window: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl VolatilityEstimator {
    /// `window` is the number of trailing returns per estimate; must be
    /// at least 2 for a sample standard deviation to exist.
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// One annualized sigma per input index; `None` for every index below
    /// `window`. Closes must be positive (enforced upstream by
    /// `MarketSeries`).
    pub fn estimate(&self, closes: &[Decimal]) -> Vec<Option<f64>> {
        let n = closes.len();
        let mut sigmas = vec![None; n];
        if self.window < 2 || n <= self.window {
            return sigmas;
        }

        let closes_f: Vec<f64> = closes
            .iter()
            .map(|&c| c.try_into().unwrap_or(f64::NAN))
            .collect();

        // returns[i] is the log return from close[i-1] to close[i]; slot 0 unused
        let mut returns = vec![0.0; n];
        for i in 1..n {
            returns[i] = (closes_f[i] / closes_f[i - 1]).ln();
        }

        let w = self.window;
        let annualize = (TRADING_DAYS_PER_YEAR as f64).sqrt();

        for i in w..n {
            let window = &returns[i - w + 1..=i];
            let mean = window.iter().sum::<f64>() / w as f64;
            let variance =
                window.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (w - 1) as f64;
            sigmas[i] = Some(variance.sqrt() * annualize);
        }

        sigmas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn closes_from(values: impl IntoIterator<Item = i64>) -> Vec<Decimal> {
        values.into_iter().map(Decimal::from).collect()
    }

    #[test]
    fn test_undefined_before_window_defined_after() {
        let estimator = VolatilityEstimator::default();
        let closes = closes_from((0..300).map(|i| 100 + i % 5));
        let sigmas = estimator.estimate(&closes);

        assert_eq!(sigmas.len(), 300);
        for sigma in sigmas.iter().take(TRADING_DAYS_PER_YEAR) {
            assert!(sigma.is_none());
        }
        for sigma in sigmas.iter().skip(TRADING_DAYS_PER_YEAR) {
            assert!(sigma.unwrap() >= 0.0);
        }
    }

    #[test]
    fn test_entries_outside_trailing_window_do_not_matter() {
        let estimator = VolatilityEstimator::default();
        let closes = closes_from((0..300).map(|i| 100 + i % 5));
        let baseline = estimator.estimate(&closes)[299];

        // Index 299 looks back at closes 47..=299 only
        let mut perturbed = closes.clone();
        for c in perturbed.iter_mut().take(40) {
            *c = Decimal::from(500);
        }
        let shifted = estimator.estimate(&perturbed)[299];

        assert_eq!(baseline, shifted);
    }

    #[test]
    fn test_constant_closes_have_zero_sigma() {
        let estimator = VolatilityEstimator::new(10);
        let closes = closes_from(std::iter::repeat(150).take(30));
        let sigmas = estimator.estimate(&closes);
        assert_eq!(sigmas[20], Some(0.0));
    }

    #[test]
    fn test_alternating_closes_match_hand_formula() {
        // Closes alternating 100, 110 give returns of +/- ln(1.1). Over a
        // window of 4 the mean is 0 and the sample variance is 4r^2/3.
        let estimator = VolatilityEstimator::new(4);
        let closes = closes_from([100, 110, 100, 110, 100, 110, 100, 110]);
        let sigmas = estimator.estimate(&closes);

        let r = (1.1f64).ln();
        let expected = (4.0 * r * r / 3.0).sqrt() * (TRADING_DAYS_PER_YEAR as f64).sqrt();
        assert_relative_eq!(sigmas[5].unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_short_series_entirely_undefined() {
        let estimator = VolatilityEstimator::default();
        let closes = closes_from((0..100).map(|i| 100 + i));
        assert!(estimator.estimate(&closes).iter().all(Option::is_none));
    }
}
