//! Trailing-burn runway estimation over an aggregated KPI series
//!
//! Runway for period `i` divides that period's cash by the mean burn of the
//! window `max(0, i - 2)..=i`. The divisor is floored at [`MIN_BURN_DIVISOR`] so a
//! profitable or flat company reports its cash balance rather than an infinite runway.

use super::KpiResult;

/// Number of periods averaged for the trailing burn, including the current one
pub const TRAILING_BURN_WINDOW: usize = 3;

/// Lower bound applied to any burn divisor
pub const MIN_BURN_DIVISOR: f64 = 1.0;

/// Runway at a given burn rate with the divisor floor applied
pub fn runway_months(cash_balance: f64, burn: f64) -> f64 {
    cash_balance / burn.max(MIN_BURN_DIVISOR)
}

/// Mean burn over the trailing window ending at `index`, `None` past the end of `series`
pub fn trailing_average_burn(series: &[KpiResult], index: usize) -> Option<f64> {
    let start = index.saturating_add(1).saturating_sub(TRAILING_BURN_WINDOW);
    let window = series.get(start..=index)?;
    Some(window.iter().map(|r| r.burn).sum::<f64>() / window.len() as f64)
}

/// Fill `runway_months` on a period-sorted series in place
pub fn apply_trailing_runway(series: &mut [KpiResult]) {
    let averages: Vec<f64> = (0..series.len())
        .filter_map(|i| trailing_average_burn(series, i))
        .collect();

    for (row, avg_burn) in series.iter_mut().zip(averages) {
        row.runway_months = runway_months(row.cash_balance, avg_burn);
    }
}
