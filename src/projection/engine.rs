//! Forecast engine projecting a KPI series forward month by month

use super::state::ForecastState;
use crate::kpi::{burn_from_ebitda, runway::runway_months, KpiResult};
use serde::{Deserialize, Serialize};

/// Default forecast horizon in months
pub const DEFAULT_FORECAST_MONTHS: u32 = 12;

/// Growth and margin drivers applied uniformly to every projected month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// Month-over-month revenue growth, compounded (0.05 = 5%)
    pub revenue_growth: f64,

    /// Gross margin applied to each month's revenue, not compounded
    pub gross_margin: f64,

    /// Month-over-month opex growth, compounded
    pub opex_growth: f64,
}

impl ScenarioParams {
    pub fn new(revenue_growth: f64, gross_margin: f64, opex_growth: f64) -> Self {
        Self {
            revenue_growth,
            gross_margin,
            opex_growth,
        }
    }
}

/// Configuration for a forecast run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Number of months to project
    pub months: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            months: DEFAULT_FORECAST_MONTHS,
        }
    }
}

/// Main forecast engine
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    params: ScenarioParams,
    config: ForecastConfig,
}

impl ForecastEngine {
    /// Create a new forecast engine with given drivers and config
    pub fn new(params: ScenarioParams, config: ForecastConfig) -> Self {
        Self { params, config }
    }

    pub fn params(&self) -> &ScenarioParams {
        &self.params
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Project forward from the last entry of `base_kpis`
    ///
    /// Returns `config.months` rows, or an empty series when `base_kpis` is empty.
    pub fn project(&self, base_kpis: &[KpiResult]) -> Vec<KpiResult> {
        let Some(anchor) = base_kpis.last() else {
            return Vec::new();
        };

        let mut state = ForecastState::from_anchor(anchor);
        let mut rows = Vec::with_capacity(self.config.months as usize);

        for _month in 1..=self.config.months {
            if !state.advance_month() {
                log::warn!(
                    "forecast stopped at {} after {} months: calendar range exhausted",
                    state.period,
                    rows.len()
                );
                break;
            }
            rows.push(self.calculate_month(&mut state));
        }

        rows
    }

    /// Apply one month of growth to the running state and emit its KPI row
    fn calculate_month(&self, state: &mut ForecastState) -> KpiResult {
        state.revenue *= 1.0 + self.params.revenue_growth;
        state.opex *= 1.0 + self.params.opex_growth;

        let gross_profit = state.revenue * self.params.gross_margin;
        let ebitda = gross_profit - state.opex;
        let burn = burn_from_ebitda(ebitda);

        state.cash_balance = (state.cash_balance - burn).max(0.0);

        KpiResult {
            period: state.period,
            revenue: state.revenue,
            gross_profit,
            gross_margin: self.params.gross_margin,
            opex: state.opex,
            ebitda,
            burn,
            cash_balance: state.cash_balance,
            // Single-month burn here, unlike the trailing average used for actuals
            runway_months: runway_months(state.cash_balance, burn),
        }
    }
}

/// Project `months` periods from the last KPI under constant drivers
pub fn forecast(
    base_kpis: &[KpiResult],
    months: u32,
    revenue_growth: f64,
    gross_margin: f64,
    opex_growth: f64,
) -> Vec<KpiResult> {
    ForecastEngine::new(
        ScenarioParams::new(revenue_growth, gross_margin, opex_growth),
        ForecastConfig { months },
    )
    .project(base_kpis)
}
