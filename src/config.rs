//! Engine settings loaded from JSON
//!
//! Every field has a default, so an empty object `{}` is a valid settings file.

use crate::error::Result;
use crate::portfolio::RiskThresholds;
use crate::projection::DEFAULT_FORECAST_MONTHS;
use crate::scenario::NamedScenario;
use crate::sensitivity::{DEFAULT_GROSS_MARGIN_RANGE, DEFAULT_REVENUE_GROWTH_RANGE, DEFAULT_SENSITIVITY_MONTHS};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Axes and horizon for the report pack's sensitivity grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivitySettings {
    pub revenue_growth_range: Vec<f64>,
    pub gross_margin_range: Vec<f64>,
    pub months: u32,
}

impl Default for SensitivitySettings {
    fn default() -> Self {
        Self {
            revenue_growth_range: DEFAULT_REVENUE_GROWTH_RANGE.to_vec(),
            gross_margin_range: DEFAULT_GROSS_MARGIN_RANGE.to_vec(),
            months: DEFAULT_SENSITIVITY_MONTHS,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Horizon for the Base forecast and the scenario runs
    pub forecast_months: u32,
    pub sensitivity: SensitivitySettings,
    pub risk: RiskThresholds,
    /// Overrides for the Base/Upside/Downside drivers, matched by name
    pub scenarios: Vec<NamedScenario>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            forecast_months: DEFAULT_FORECAST_MONTHS,
            sensitivity: SensitivitySettings::default(),
            risk: RiskThresholds::default(),
            scenarios: Vec::new(),
        }
    }
}

impl EngineSettings {
    /// Load settings from a JSON reader
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load settings from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Settings from `path` if given, otherwise the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_json_path(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ScenarioParams;

    #[test]
    fn test_empty_object_uses_defaults() {
        let settings = EngineSettings::from_reader("{}".as_bytes()).unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.forecast_months, 12);
        assert_eq!(settings.sensitivity.revenue_growth_range, vec![-0.05, 0.0, 0.05]);
        assert_eq!(settings.risk.runway_risk_threshold, 6.0);
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "forecast_months": 24,
            "sensitivity": {"gross_margin_range": [0.7]},
            "scenarios": [{"name": "Base", "revenue_growth": 0.02, "gross_margin": 0.55, "opex_growth": 0.01}]
        }"#;
        let settings = EngineSettings::from_reader(json.as_bytes()).unwrap();
        assert_eq!(settings.forecast_months, 24);
        assert_eq!(settings.sensitivity.gross_margin_range, vec![0.7]);
        assert_eq!(settings.sensitivity.months, 12);
        assert_eq!(settings.scenarios[0].params, ScenarioParams::new(0.02, 0.55, 0.01));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(EngineSettings::from_reader("{\"forecast_months\": \"soon\"}".as_bytes()).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(EngineSettings::load(Some(Path::new("does/not/exist.json"))).is_err());
        assert!(EngineSettings::load(None).is_ok());
    }
}
