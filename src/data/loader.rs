//! CSV loader for daily close/RSI series.
//!
//! The market-data fetch and the RSI computation live outside this crate;
//! what arrives here is a plain CSV export with one row per trading day:
//!
//! ```text
//! date,close,rsi
//! 2020-01-02,135.20,
//! 2020-01-03,133.10,41.8
//! ```
//!
//! The `rsi` field is empty for indicator warmup rows.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use super::types::{MarketSeries, PriceBar, SeriesError};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Series(#[from] SeriesError),
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    close: Decimal,
    rsi: Option<f64>,
}

/// Load a `date,close,rsi` CSV file into a validated [`MarketSeries`].
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<MarketSeries, LoaderError> {
    let reader = csv::Reader::from_path(path.as_ref())?;
    read_series(reader)
}

fn read_series<R: Read>(mut reader: csv::Reader<R>) -> Result<MarketSeries, LoaderError> {
    let mut bars = Vec::new();
    let mut rsi = Vec::new();

    for row in reader.deserialize() {
        let row: CsvRow = row?;
        bars.push(PriceBar {
            date: row.date,
            close: row.close,
        });
        rsi.push(row.rsi);
    }

    Ok(MarketSeries::new(bars, rsi)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn from_str(data: &str) -> Result<MarketSeries, LoaderError> {
        read_series(csv::Reader::from_reader(data.as_bytes()))
    }

    #[test]
    fn test_load_well_formed_csv() {
        let series = from_str(
            "date,close,rsi\n\
             2020-01-02,135.20,\n\
             2020-01-03,133.10,41.8\n\
             2020-01-06,136.55,72.3\n",
        )
        .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(
            series.close_at(NaiveDate::from_ymd_opt(2020, 1, 3).unwrap()),
            Some(dec!(133.10))
        );
        assert_eq!(series.records()[0].rsi, None);
        assert_eq!(series.records()[2].rsi, Some(72.3));
    }

    #[test]
    fn test_malformed_row_errors() {
        assert!(matches!(
            from_str("date,close,rsi\n2020-01-02,not-a-number,\n"),
            Err(LoaderError::Csv(_))
        ));
    }

    #[test]
    fn test_unsorted_csv_errors() {
        assert!(matches!(
            from_str(
                "date,close,rsi\n\
                 2020-01-03,133.10,\n\
                 2020-01-02,135.20,\n"
            ),
            Err(LoaderError::Series(SeriesError::OutOfOrder(_)))
        ));
    }

    #[test]
    fn test_empty_csv_errors() {
        assert!(matches!(
            from_str("date,close,rsi\n"),
            Err(LoaderError::Series(SeriesError::Empty))
        ));
    }
}
