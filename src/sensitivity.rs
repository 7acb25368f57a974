//! Two-driver sensitivity sweep over the forecast engine
//!
//! Cells come out row-major: outer loop over revenue growth, inner loop over
//! gross margin. Renderers lay the grid out positionally, so this order is fixed.

use crate::kpi::KpiResult;
use crate::projection::{ForecastConfig, ForecastEngine, ScenarioParams};
use serde::{Deserialize, Serialize};

/// Default horizon for each cell's forecast
pub const DEFAULT_SENSITIVITY_MONTHS: u32 = 12;

/// Default revenue growth axis
pub const DEFAULT_REVENUE_GROWTH_RANGE: [f64; 3] = [-0.05, 0.0, 0.05];

/// Default gross margin axis
pub const DEFAULT_GROSS_MARGIN_RANGE: [f64; 3] = [0.4, 0.5, 0.6];

/// Terminal runway for one (revenue growth, gross margin) combination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityCell {
    pub revenue_growth: f64,
    pub gross_margin: f64,
    pub runway_months: f64,
}

/// Run one forecast per `(revenue_growth, gross_margin)` pair with fixed opex growth
///
/// Each cell keeps only the last projected runway, 0.0 when the forecast is empty.
pub fn sensitivity_grid(
    base_kpis: &[KpiResult],
    revenue_growth_range: &[f64],
    gross_margin_range: &[f64],
    opex_growth: f64,
    months: u32,
) -> Vec<SensitivityCell> {
    let config = ForecastConfig { months };
    let mut grid = Vec::with_capacity(revenue_growth_range.len() * gross_margin_range.len());

    for &revenue_growth in revenue_growth_range {
        for &gross_margin in gross_margin_range {
            let params = ScenarioParams::new(revenue_growth, gross_margin, opex_growth);
            let projected = ForecastEngine::new(params, config).project(base_kpis);
            let runway_months = projected.last().map(|r| r.runway_months).unwrap_or(0.0);
            grid.push(SensitivityCell {
                revenue_growth,
                gross_margin,
                runway_months,
            });
        }
    }

    log::debug!(
        "sensitivity grid {}x{} over {} months",
        revenue_growth_range.len(),
        gross_margin_range.len(),
        months
    );
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::forecast;
    use chrono::NaiveDate;

    fn base() -> Vec<KpiResult> {
        vec![KpiResult {
            period: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            revenue: 10_000.0,
            gross_profit: 5_000.0,
            gross_margin: 0.5,
            opex: 7_000.0,
            ebitda: -2_000.0,
            burn: 2_000.0,
            cash_balance: 60_000.0,
            runway_months: 30.0,
        }]
    }

    #[test]
    fn test_grid_size_and_row_major_order() {
        let grid = sensitivity_grid(&base(), &[0.1, 0.2, 0.3], &[0.4, 0.5, 0.6], 0.02, 12);
        assert_eq!(grid.len(), 9);

        let axes: Vec<(f64, f64)> = grid.iter().map(|c| (c.revenue_growth, c.gross_margin)).collect();
        assert_eq!(
            axes,
            vec![
                (0.1, 0.4),
                (0.1, 0.5),
                (0.1, 0.6),
                (0.2, 0.4),
                (0.2, 0.5),
                (0.2, 0.6),
                (0.3, 0.4),
                (0.3, 0.5),
                (0.3, 0.6),
            ]
        );
    }

    #[test]
    fn test_cell_holds_terminal_runway() {
        let grid = sensitivity_grid(&base(), &[-0.05], &[0.4], 0.03, 12);
        let expected = forecast(&base(), 12, -0.05, 0.4, 0.03).last().unwrap().runway_months;
        assert_eq!(grid[0].runway_months, expected);
    }

    #[test]
    fn test_empty_base_gives_zero_runway_cells() {
        let grid = sensitivity_grid(&[], &DEFAULT_REVENUE_GROWTH_RANGE, &DEFAULT_GROSS_MARGIN_RANGE, 0.03, 12);
        assert_eq!(grid.len(), 9);
        assert!(grid.iter().all(|c| c.runway_months == 0.0));
    }

    #[test]
    fn test_empty_axis_gives_empty_grid() {
        assert!(sensitivity_grid(&base(), &[], &[0.5], 0.0, 12).is_empty());
        assert!(sensitivity_grid(&base(), &[0.1], &[], 0.0, DEFAULT_SENSITIVITY_MONTHS).is_empty());
    }

    #[test]
    fn test_higher_margin_never_shortens_runway() {
        let grid = sensitivity_grid(&base(), &[0.0], &DEFAULT_GROSS_MARGIN_RANGE, 0.0, 12);
        assert!(grid.windows(2).all(|w| w[1].runway_months >= w[0].runway_months));
    }
}
