//! Scenario runner for named forecast assumptions
//!
//! Holds the historical KPI series once, then projects it under any number of
//! scenario drivers and compares the terminal outcomes.

use crate::kpi::KpiResult;
use crate::projection::{ForecastConfig, ForecastEngine, ScenarioParams};
use serde::{Deserialize, Serialize};

pub const BASE_SCENARIO: &str = "Base";
pub const UPSIDE_SCENARIO: &str = "Upside";
pub const DOWNSIDE_SCENARIO: &str = "Downside";

/// Scenario drivers under a display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedScenario {
    pub name: String,
    #[serde(flatten)]
    pub params: ScenarioParams,
}

impl NamedScenario {
    pub fn new(name: impl Into<String>, params: ScenarioParams) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// Built-in Base, Upside and Downside drivers, in that order
pub fn default_scenarios() -> Vec<NamedScenario> {
    vec![
        NamedScenario::new(BASE_SCENARIO, ScenarioParams::new(0.05, 0.6, 0.03)),
        NamedScenario::new(UPSIDE_SCENARIO, ScenarioParams::new(0.1, 0.65, 0.04)),
        NamedScenario::new(DOWNSIDE_SCENARIO, ScenarioParams::new(-0.02, 0.5, 0.02)),
    ]
}

/// The three default scenarios, each replaced by a same-named override if one exists
///
/// Overrides with other names are ignored.
pub fn resolve_scenarios(overrides: &[NamedScenario]) -> Vec<NamedScenario> {
    default_scenarios()
        .into_iter()
        .map(|default| {
            overrides
                .iter()
                .find(|s| s.name == default.name)
                .cloned()
                .unwrap_or(default)
        })
        .collect()
}

/// Terminal figures of one scenario's forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub ending_revenue: f64,
    pub ending_ebitda: f64,
    pub ending_runway_months: f64,
}

/// Difference between a scenario outcome and the Base outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDelta {
    pub name: String,
    pub delta_revenue: f64,
    pub delta_ebitda: f64,
    pub delta_runway_months: f64,
}

/// Deltas against Base for every other outcome; empty when Base is absent
pub fn scenario_deltas(outcomes: &[ScenarioOutcome]) -> Vec<ScenarioDelta> {
    let Some(base) = outcomes.iter().find(|o| o.name == BASE_SCENARIO) else {
        return Vec::new();
    };

    outcomes
        .iter()
        .filter(|o| o.name != BASE_SCENARIO)
        .map(|o| ScenarioDelta {
            name: o.name.clone(),
            delta_revenue: o.ending_revenue - base.ending_revenue,
            delta_ebitda: o.ending_ebitda - base.ending_ebitda,
            delta_runway_months: o.ending_runway_months - base.ending_runway_months,
        })
        .collect()
}

/// Pre-loaded scenario runner over one company's KPI history
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_kpis: Vec<KpiResult>,
    config: ForecastConfig,
}

impl ScenarioRunner {
    pub fn new(base_kpis: Vec<KpiResult>, config: ForecastConfig) -> Self {
        Self { base_kpis, config }
    }

    /// Run a single forecast with the given drivers
    pub fn run(&self, params: ScenarioParams) -> Vec<KpiResult> {
        ForecastEngine::new(params, self.config).project(&self.base_kpis)
    }

    /// Run each scenario and keep its terminal figures
    ///
    /// An empty history yields zeroed outcomes rather than skipping the scenario.
    pub fn run_scenarios(&self, scenarios: &[NamedScenario]) -> Vec<ScenarioOutcome> {
        scenarios
            .iter()
            .map(|scenario| {
                let projected = self.run(scenario.params);
                let last = projected.last();
                ScenarioOutcome {
                    name: scenario.name.clone(),
                    ending_revenue: last.map(|r| r.revenue).unwrap_or(0.0),
                    ending_ebitda: last.map(|r| r.ebitda).unwrap_or(0.0),
                    ending_runway_months: last.map(|r| r.runway_months).unwrap_or(0.0),
                }
            })
            .collect()
    }

    pub fn base_kpis(&self) -> &[KpiResult] {
        &self.base_kpis
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }
}
