//! KPI aggregation and runway estimation over historical actuals

mod aggregator;
mod result;
pub mod runway;

pub use aggregator::{compute_kpis, group_by_period, PeriodTotals};
pub use result::{burn_from_ebitda, safe_divide, KpiResult};
