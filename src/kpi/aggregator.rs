//! Period aggregation of actuals into KPI results

use super::result::{burn_from_ebitda, safe_divide, KpiResult};
use super::runway::apply_trailing_runway;
use crate::actuals::{ActualRecord, Category, OPEX_CATEGORIES};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Summed amounts per category for one period
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodTotals {
    amounts: BTreeMap<Category, f64>,
}

impl PeriodTotals {
    /// Add an amount; repeated categories accumulate
    pub fn add(&mut self, category: Category, amount: f64) {
        *self.amounts.entry(category).or_insert(0.0) += amount;
    }

    /// Summed amount, 0 when the category never appeared
    pub fn amount(&self, category: Category) -> f64 {
        self.amounts.get(&category).copied().unwrap_or(0.0)
    }

    /// Derive the period KPIs; runway is left at 0 for the trailing pass
    pub fn to_kpi(&self, period: NaiveDate) -> KpiResult {
        let revenue = self.amount(Category::Revenue);
        let cogs = self.amount(Category::Cogs);
        let gross_profit = revenue - cogs;
        let gross_margin = safe_divide(gross_profit, revenue);
        let opex: f64 = OPEX_CATEGORIES.iter().map(|c| self.amount(*c)).sum();
        let ebitda = gross_profit - opex;

        KpiResult {
            period,
            revenue,
            gross_profit,
            gross_margin,
            opex,
            ebitda,
            burn: burn_from_ebitda(ebitda),
            cash_balance: self.amount(Category::Cash),
            runway_months: 0.0,
        }
    }
}

/// Group records into `period -> category -> summed amount`
pub fn group_by_period(records: &[ActualRecord]) -> BTreeMap<NaiveDate, PeriodTotals> {
    let mut grouped: BTreeMap<NaiveDate, PeriodTotals> = BTreeMap::new();
    for record in records {
        grouped
            .entry(record.period)
            .or_default()
            .add(record.category, record.amount);
    }
    grouped
}

/// Compute one KPI result per distinct period, ascending by period
///
/// Empty input yields an empty series.
pub fn compute_kpis(records: &[ActualRecord]) -> Vec<KpiResult> {
    let grouped = group_by_period(records);

    let mut results: Vec<KpiResult> = grouped
        .iter()
        .map(|(period, totals)| totals.to_kpi(*period))
        .collect();

    apply_trailing_runway(&mut results);

    log::debug!(
        "aggregated {} records into {} periods",
        records.len(),
        results.len()
    );
    results
}
