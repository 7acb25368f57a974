//! Per-period KPI output structure

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Financial summary for a single period, historical or projected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiResult {
    pub period: NaiveDate,
    pub revenue: f64,
    /// Revenue less cost of goods sold
    pub gross_profit: f64,
    /// Gross profit over revenue; 0 when revenue is 0
    pub gross_margin: f64,
    /// Sum of the four operating expense categories
    pub opex: f64,
    pub ebitda: f64,
    /// `max(0, -ebitda)`
    pub burn: f64,
    /// Cash snapshot for the period
    pub cash_balance: f64,
    pub runway_months: f64,
}

/// Division that yields 0 instead of faulting on a zero denominator
pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Cash outflow implied by an EBITDA figure
pub fn burn_from_ebitda(ebitda: f64) -> f64 {
    (-ebitda).max(0.0)
}
