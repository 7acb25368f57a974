//! Report pack assembly and CSV export for downstream renderers

use crate::actuals::{ActualRecord, CategoryMapping, RawActual};
use crate::config::EngineSettings;
use crate::error::{EngineError, Result};
use crate::kpi::{compute_kpis, KpiResult};
use crate::projection::ForecastConfig;
use crate::scenario::{resolve_scenarios, scenario_deltas, NamedScenario, ScenarioDelta, ScenarioOutcome, ScenarioRunner};
use crate::sensitivity::{sensitivity_grid, SensitivityCell};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Everything a renderer needs for one company's reporting pack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPack {
    pub company: String,
    pub kpis: Vec<KpiResult>,
    /// Base scenario forecast
    pub forecast: Vec<KpiResult>,
    pub scenarios: Vec<NamedScenario>,
    pub scenario_results: Vec<ScenarioOutcome>,
    pub scenario_deltas: Vec<ScenarioDelta>,
    pub sensitivity: Vec<SensitivityCell>,
}

impl ReportPack {
    /// Build the pack from normalized actuals
    pub fn build(company: impl Into<String>, records: &[ActualRecord], settings: &EngineSettings) -> Self {
        let company = company.into();
        let kpis = compute_kpis(records);
        let scenarios = resolve_scenarios(&settings.scenarios);

        // resolve_scenarios always yields Base first
        let base = scenarios[0].params;

        let runner = ScenarioRunner::new(
            kpis.clone(),
            ForecastConfig {
                months: settings.forecast_months,
            },
        );
        let forecast = runner.run(base);
        let scenario_results = runner.run_scenarios(&scenarios);
        let scenario_deltas = scenario_deltas(&scenario_results);

        let sensitivity = sensitivity_grid(
            &kpis,
            &settings.sensitivity.revenue_growth_range,
            &settings.sensitivity.gross_margin_range,
            base.opex_growth,
            settings.sensitivity.months,
        );

        log::info!(
            "pack built for {}: {} periods, {} forecast months, {} sensitivity cells",
            company,
            kpis.len(),
            forecast.len(),
            sensitivity.len()
        );

        Self {
            company,
            kpis,
            forecast,
            scenarios,
            scenario_results,
            scenario_deltas,
            sensitivity,
        }
    }

    /// Build the pack from imported rows, refusing while any label is unmapped
    pub fn from_raw(
        company: impl Into<String>,
        rows: &[RawActual],
        mapping: &CategoryMapping,
        settings: &EngineSettings,
    ) -> Result<Self> {
        let unmapped = mapping.unmapped_accounts(rows.iter().map(|r| r.category.as_str()));
        if !unmapped.is_empty() {
            return Err(EngineError::UnmappedAccounts(unmapped));
        }
        let records = mapping.normalize(rows)?;
        Ok(Self::build(company, &records, settings))
    }

    /// Pretty JSON; flushes so buffered write errors surface here
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Write a KPI series (historical or projected) as CSV with a header row
pub fn write_kpis_csv<W: Write>(writer: W, kpis: &[KpiResult]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if kpis.is_empty() {
        csv_writer.write_record([
            "period",
            "revenue",
            "gross_profit",
            "gross_margin",
            "opex",
            "ebitda",
            "burn",
            "cash_balance",
            "runway_months",
        ])?;
    }
    for row in kpis {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write sensitivity cells as CSV in grid order
pub fn write_sensitivity_csv<W: Write>(writer: W, cells: &[SensitivityCell]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if cells.is_empty() {
        csv_writer.write_record(["revenue_growth", "gross_margin", "runway_months"])?;
    }
    for cell in cells {
        csv_writer.serialize(cell)?;
    }
    csv_writer.flush()?;
    Ok(())
}
