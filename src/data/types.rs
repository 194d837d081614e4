//! Core data types for the spread backtester.
//!
//! The engine operates on a [`MarketSeries`]: a validated, chronologically
//! ascending daily close series with an injected RSI column. Validation
//! happens once at construction; everything downstream can assume the
//! invariants hold.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// A single daily close observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date.
    pub date: NaiveDate,

    /// Closing price. Must be positive.
    pub close: Decimal,
}

/// One fully assembled row of the input series: close plus the externally
/// computed RSI for that date (`None` during the indicator warmup).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub close: Decimal,
    pub rsi: Option<f64>,
}

/// Structural problems with the input series. These are fatal: a run never
/// starts on malformed input.
#[derive(Error, Debug)]
pub enum SeriesError {
    #[error("price series is empty")]
    Empty,

    #[error("price series has {bars} bars but RSI series has {rsi} values")]
    LengthMismatch { bars: usize, rsi: usize },

    #[error("non-positive close on {0}")]
    NonPositiveClose(NaiveDate),

    #[error("dates not strictly ascending at {0}")]
    OutOfOrder(NaiveDate),
}

/// Validated daily market series with O(1) date lookup.
///
/// Replaces the parallel date/price/RSI lists of ad-hoc backtest scripts:
/// each row is one record, and expiration-date lookups go through the
/// date index instead of a linear scan.
#[derive(Debug, Clone)]
pub struct MarketSeries {
    records: Vec<DailyRecord>,
    index: HashMap<NaiveDate, usize>,
}

impl MarketSeries {
    /// Assemble a series from price bars and the matching RSI values.
    ///
    /// Fails on an empty series, mismatched lengths, a non-positive close,
    /// or dates that are not strictly ascending (duplicates included).
    pub fn new(bars: Vec<PriceBar>, rsi: Vec<Option<f64>>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }
        if bars.len() != rsi.len() {
            return Err(SeriesError::LengthMismatch {
                bars: bars.len(),
                rsi: rsi.len(),
            });
        }

        let mut records: Vec<DailyRecord> = Vec::with_capacity(bars.len());
        let mut index = HashMap::with_capacity(bars.len());

        for (i, (bar, rsi)) in bars.into_iter().zip(rsi).enumerate() {
            if bar.close <= Decimal::ZERO {
                return Err(SeriesError::NonPositiveClose(bar.date));
            }
            if let Some(prev) = records.last() {
                if bar.date <= prev.date {
                    return Err(SeriesError::OutOfOrder(bar.date));
                }
            }
            index.insert(bar.date, i);
            records.push(DailyRecord {
                date: bar.date,
                close: bar.close,
                rsi,
            });
        }

        Ok(Self { records, index })
    }

    /// Number of trading days in the series.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in chronological order.
    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    /// The close column, in order.
    pub fn closes(&self) -> Vec<Decimal> {
        self.records.iter().map(|r| r.close).collect()
    }

    /// Whether `date` is a listed trading day.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.index.contains_key(&date)
    }

    /// Close price on `date`, if listed.
    pub fn close_at(&self, date: NaiveDate) -> Option<Decimal> {
        self.index.get(&date).map(|&i| self.records[i].close)
    }

    /// First trading date.
    pub fn first_date(&self) -> NaiveDate {
        self.records[0].date
    }

    /// Last trading date.
    pub fn last_date(&self) -> NaiveDate {
        self.records[self.records.len() - 1].date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bars(closes: &[(u32, Decimal)]) -> Vec<PriceBar> {
        closes
            .iter()
            .map(|&(day, close)| PriceBar {
                date: date(2024, 1, day),
                close,
            })
            .collect()
    }

    #[test]
    fn test_series_construction() {
        let bars = bars(&[(2, dec!(150)), (3, dec!(151)), (4, dec!(149))]);
        let series = MarketSeries::new(bars, vec![None, Some(55.0), Some(60.0)]).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.first_date(), date(2024, 1, 2));
        assert_eq!(series.last_date(), date(2024, 1, 4));
        assert_eq!(series.close_at(date(2024, 1, 3)), Some(dec!(151)));
        assert_eq!(series.close_at(date(2024, 1, 5)), None);
        assert!(series.contains(date(2024, 1, 4)));
        assert_eq!(series.closes(), vec![dec!(150), dec!(151), dec!(149)]);
    }

    #[test]
    fn test_empty_series_rejected() {
        assert!(matches!(
            MarketSeries::new(vec![], vec![]),
            Err(SeriesError::Empty)
        ));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let bars = bars(&[(2, dec!(150))]);
        assert!(matches!(
            MarketSeries::new(bars, vec![None, Some(50.0)]),
            Err(SeriesError::LengthMismatch { bars: 1, rsi: 2 })
        ));
    }

    #[test]
    fn test_non_positive_close_rejected() {
        let bars = bars(&[(2, dec!(150)), (3, dec!(0))]);
        assert!(matches!(
            MarketSeries::new(bars, vec![None, None]),
            Err(SeriesError::NonPositiveClose(_))
        ));
    }

    #[test]
    fn test_unsorted_dates_rejected() {
        let mut b = bars(&[(2, dec!(150)), (4, dec!(151))]);
        b.push(PriceBar {
            date: date(2024, 1, 3),
            close: dec!(152),
        });
        assert!(matches!(
            MarketSeries::new(b, vec![None, None, None]),
            Err(SeriesError::OutOfOrder(_))
        ));
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let b = bars(&[(2, dec!(150)), (2, dec!(151))]);
        assert!(matches!(
            MarketSeries::new(b, vec![None, None]),
            Err(SeriesError::OutOfOrder(_))
        ));
    }
}
