//! Portfolio KPI - Financial computation engine for portfolio company actuals
//!
//! This library provides:
//! - Actuals import and normalization onto a fixed canonical category set
//! - Per-period KPI aggregation with trailing-burn runway
//! - Month-by-month forecasts under constant growth and margin drivers
//! - Named scenario runs and two-driver sensitivity grids
//! - Portfolio dashboard with threshold-based risk flags
//!
//! The computation engine (`compute_kpis`, `forecast`, `sensitivity_grid`) is pure and
//! total: identical inputs give bit-identical outputs, and empty inputs give empty outputs.

pub mod actuals;
pub mod config;
pub mod error;
pub mod kpi;
pub mod portfolio;
pub mod projection;
pub mod report;
pub mod scenario;
pub mod sensitivity;

// Re-export commonly used types
pub use actuals::{ActualRecord, Category, CategoryMapping, RawActual, CANONICAL_CATEGORIES};
pub use config::EngineSettings;
pub use error::{EngineError, Result};
pub use kpi::{compute_kpis, KpiResult};
pub use portfolio::{portfolio_dashboard, CompanyActuals, Dashboard, RiskThresholds};
pub use projection::{forecast, ForecastConfig, ForecastEngine, ScenarioParams};
pub use report::ReportPack;
pub use scenario::{NamedScenario, ScenarioRunner};
pub use sensitivity::{sensitivity_grid, SensitivityCell};
