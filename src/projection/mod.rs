//! Forecast projection of KPI series under constant drivers

pub mod calendar;
mod engine;
mod state;

pub use engine::{forecast, ForecastConfig, ForecastEngine, ScenarioParams, DEFAULT_FORECAST_MONTHS};
pub use state::ForecastState;
