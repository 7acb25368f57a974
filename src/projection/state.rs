//! Forecast state carried from one projected month to the next

use super::calendar::next_month_start;
use crate::kpi::KpiResult;

/// Running state of a forecast at a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastState {
    /// Period of the last row produced (the anchor before the first step)
    pub period: chrono::NaiveDate,

    /// Revenue, compounded each step
    pub revenue: f64,

    /// Operating expenses, compounded each step
    pub opex: f64,

    /// Cash balance, reduced by burn and floored at zero
    pub cash_balance: f64,
}

impl ForecastState {
    /// Initialize state from the anchor period (the last historical KPI)
    pub fn from_anchor(anchor: &KpiResult) -> Self {
        Self {
            period: anchor.period,
            revenue: anchor.revenue,
            opex: anchor.opex,
            cash_balance: anchor.cash_balance,
        }
    }

    /// Move the period to the first day of the next month
    ///
    /// Returns `false` and leaves the state unchanged past the calendar range.
    pub fn advance_month(&mut self) -> bool {
        match next_month_start(self.period) {
            Some(next) => {
                self.period = next;
                true
            }
            None => false,
        }
    }
}
