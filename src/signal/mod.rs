//! RSI threshold classification.
//!
//! The RSI itself is computed upstream and injected with the price series;
//! this module only turns a value into an entry signal. Overbought readings
//! sell call spreads, oversold readings sell put spreads.

use serde::{Deserialize, Serialize};

/// Entry signal for a trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    /// RSI strictly above the upper threshold: short a call spread.
    Overbought,
    /// RSI strictly below the lower threshold: short a put spread.
    Oversold,
    /// No entry.
    Neutral,
}

/// Classifies RSI readings against fixed thresholds.
///
/// Comparisons are strict: a reading exactly on a threshold is `Neutral`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalGenerator {
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for SignalGenerator {
    fn default() -> Self {
        Self {
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

impl SignalGenerator {
    pub fn new(overbought: f64, oversold: f64) -> Self {
        Self {
            overbought,
            oversold,
        }
    }

    /// Classify one day's RSI. `None` (indicator warmup) is `Neutral`.
    pub fn classify(&self, rsi: Option<f64>) -> SignalKind {
        match rsi {
            Some(value) if value > self.overbought => SignalKind::Overbought,
            Some(value) if value < self.oversold => SignalKind::Oversold,
            _ => SignalKind::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_strict() {
        let signals = SignalGenerator::default();
        assert_eq!(signals.classify(Some(70.0)), SignalKind::Neutral);
        assert_eq!(signals.classify(Some(70.0001)), SignalKind::Overbought);
        assert_eq!(signals.classify(Some(30.0)), SignalKind::Neutral);
        assert_eq!(signals.classify(Some(29.9999)), SignalKind::Oversold);
    }

    #[test]
    fn test_mid_range_is_neutral() {
        let signals = SignalGenerator::default();
        assert_eq!(signals.classify(Some(50.0)), SignalKind::Neutral);
    }

    #[test]
    fn test_warmup_is_neutral() {
        let signals = SignalGenerator::default();
        assert_eq!(signals.classify(None), SignalKind::Neutral);
    }

    #[test]
    fn test_custom_thresholds() {
        let signals = SignalGenerator::new(80.0, 20.0);
        assert_eq!(signals.classify(Some(75.0)), SignalKind::Neutral);
        assert_eq!(signals.classify(Some(80.5)), SignalKind::Overbought);
        assert_eq!(signals.classify(Some(19.5)), SignalKind::Oversold);
    }
}
