//! Expiration date resolution.
//!
//! An entry targets the monthly cycle: thirty calendar days out, rolled
//! forward to a Friday, then rolled further forward past holidays until a
//! listed trading day is found.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use thiserror::Error;

use crate::data::MarketSeries;

/// The forward scan ran off the calendar without hitting a listed trading
/// day. Guards against malformed calendars with large gaps.
#[derive(Error, Debug)]
#[error("no listed expiration within {bound_days} days past {target}")]
pub struct NoExpirationFound {
    pub target: NaiveDate,
    pub bound_days: i64,
}

/// Resolves entry dates to expiration trading days against a calendar.
///
/// The calendar is the set of dates present in the market series itself,
/// so a resolved expiration always has a close price.
pub struct ExpirationResolver<'a> {
    calendar: &'a MarketSeries,
    target_days: i64,
    scan_bound_days: i64,
}

impl<'a> ExpirationResolver<'a> {
    pub fn new(calendar: &'a MarketSeries, target_days: i64, scan_bound_days: i64) -> Self {
        Self {
            calendar,
            target_days,
            scan_bound_days,
        }
    }

    /// Resolve `entry` to the expiration trading day: `entry + target_days`
    /// rolled forward to a Friday, then forward again until the date is
    /// listed. Fails once the scan passes `target + scan_bound_days`.
    pub fn resolve(&self, entry: NaiveDate) -> Result<NaiveDate, NoExpirationFound> {
        let target = entry + Duration::days(self.target_days);
        let bound = target + Duration::days(self.scan_bound_days);

        let mut date = target;
        while date.weekday() != Weekday::Fri {
            date += Duration::days(1);
        }

        while !self.calendar.contains(date) {
            date += Duration::days(1);
            if date > bound {
                return Err(NoExpirationFound {
                    target,
                    bound_days: self.scan_bound_days,
                });
            }
        }

        Ok(date)
    }
}
