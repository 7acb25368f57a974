//! Calendar-month arithmetic for projected periods

use chrono::{Datelike, NaiveDate};

/// Advance `date` by whole calendar months, landing on day 1
///
/// The input's day-of-month is discarded, so month length never matters:
/// 2024-01-31 + 1 month is 2024-02-01. Returns `None` past chrono's date range.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(months);
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month0 = total.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
}

/// First day of the month after `date`
pub fn next_month_start(date: NaiveDate) -> Option<NaiveDate> {
    add_months(date, 1)
}
