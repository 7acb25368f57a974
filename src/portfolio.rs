//! Portfolio dashboard: latest KPIs per company and threshold-based risk flags

use crate::actuals::ActualRecord;
use crate::kpi::{compute_kpis, safe_divide, KpiResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Risk thresholds compared against each company's latest KPIs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Flag when runway falls below this many months
    pub runway_risk_threshold: f64,
    /// Flag when period-over-period revenue change falls below this fraction
    pub revenue_drop_threshold: f64,
    /// Flag when gross margin change falls below this many points (as a fraction)
    pub margin_drop_threshold: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            runway_risk_threshold: 6.0,
            revenue_drop_threshold: -0.1,
            margin_drop_threshold: -0.1,
        }
    }
}

impl RiskThresholds {
    pub fn is_at_risk(&self, summary: &CompanySummary) -> bool {
        summary.runway_months < self.runway_risk_threshold
            || summary.revenue_change < self.revenue_drop_threshold
            || summary.gross_margin_change < self.margin_drop_threshold
    }
}

/// Latest-period snapshot for one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub company: String,
    pub runway_months: f64,
    pub revenue: f64,
    pub gross_margin: f64,
    /// Fractional revenue change versus the prior period; 0 without a usable prior
    pub revenue_change: f64,
    /// Gross margin minus the prior period's; 0 without a prior
    pub gross_margin_change: f64,
}

impl CompanySummary {
    /// Summarize a period-sorted KPI series; `None` when it is empty
    pub fn from_kpis(company: impl Into<String>, kpis: &[KpiResult]) -> Option<Self> {
        let (latest, history) = kpis.split_last()?;
        let prior = history.last();

        let revenue_change = prior
            .map(|p| safe_divide(latest.revenue - p.revenue, p.revenue))
            .unwrap_or(0.0);
        let gross_margin_change = prior
            .map(|p| latest.gross_margin - p.gross_margin)
            .unwrap_or(0.0);

        Some(Self {
            company: company.into(),
            runway_months: latest.runway_months,
            revenue: latest.revenue,
            gross_margin: latest.gross_margin,
            revenue_change,
            gross_margin_change,
        })
    }
}

/// One company's normalized actuals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyActuals {
    pub company: String,
    pub records: Vec<ActualRecord>,
}

/// Summaries for every company with data, plus the subset flagged at risk
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dashboard {
    pub summary: Vec<CompanySummary>,
    pub risks: Vec<CompanySummary>,
}

/// Build the portfolio dashboard
///
/// Companies are evaluated independently in parallel; input order is preserved and
/// companies without any actuals are left out.
pub fn portfolio_dashboard(companies: &[CompanyActuals], thresholds: &RiskThresholds) -> Dashboard {
    let summary: Vec<CompanySummary> = companies
        .par_iter()
        .filter_map(|c| CompanySummary::from_kpis(c.company.as_str(), &compute_kpis(&c.records)))
        .collect();

    let risks: Vec<CompanySummary> = summary
        .iter()
        .filter(|s| thresholds.is_at_risk(s))
        .cloned()
        .collect();

    for risk in &risks {
        log::warn!(
            "{} flagged: runway {:.1} months, revenue change {:.1}%, margin change {:.1} pts",
            risk.company,
            risk.runway_months,
            risk.revenue_change * 100.0,
            risk.gross_margin_change * 100.0
        );
    }
    log::info!(
        "dashboard built for {} companies, {} at risk",
        summary.len(),
        risks.len()
    );

    Dashboard { summary, risks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuals::Category;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn month(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, 1).unwrap()
    }

    fn company(name: &str, rows: &[(u32, f64, f64, f64, f64)]) -> CompanyActuals {
        // (month, revenue, cogs, opex, cash)
        let mut records = Vec::new();
        for &(m, revenue, cogs, opex, cash) in rows {
            records.push(ActualRecord::new(month(m), Category::Revenue, revenue));
            records.push(ActualRecord::new(month(m), Category::Cogs, cogs));
            records.push(ActualRecord::new(month(m), Category::GeneralAdministrative, opex));
            records.push(ActualRecord::new(month(m), Category::Cash, cash));
        }
        CompanyActuals {
            company: name.to_string(),
            records,
        }
    }

    #[test]
    fn test_summary_changes_against_prior_period() {
        let c = company("Atlas", &[(1, 1000.0, 400.0, 100.0, 10_000.0), (2, 800.0, 400.0, 100.0, 10_000.0)]);
        let summary = CompanySummary::from_kpis("Atlas", &compute_kpis(&c.records)).unwrap();
        assert_relative_eq!(summary.revenue_change, -0.2);
        assert_relative_eq!(summary.gross_margin_change, 0.5 - 0.6, epsilon = 1e-12);
        assert_eq!(summary.revenue, 800.0);
    }

    #[test]
    fn test_single_period_has_zero_changes() {
        let c = company("Solo", &[(1, 1000.0, 400.0, 100.0, 10_000.0)]);
        let summary = CompanySummary::from_kpis("Solo", &compute_kpis(&c.records)).unwrap();
        assert_eq!(summary.revenue_change, 0.0);
        assert_eq!(summary.gross_margin_change, 0.0);
    }

    #[test]
    fn test_zero_prior_revenue_gives_zero_change() {
        let c = company("Seed", &[(1, 0.0, 0.0, 100.0, 10_000.0), (2, 500.0, 100.0, 100.0, 10_000.0)]);
        let summary = CompanySummary::from_kpis("Seed", &compute_kpis(&c.records)).unwrap();
        assert_eq!(summary.revenue_change, 0.0);
    }

    #[test]
    fn test_empty_series_has_no_summary() {
        assert!(CompanySummary::from_kpis("Empty", &[]).is_none());
    }

    #[test]
    fn test_thresholds_use_strict_comparison() {
        let thresholds = RiskThresholds::default();
        let mut summary = CompanySummary {
            company: "Edge".into(),
            runway_months: 6.0,
            revenue: 1.0,
            gross_margin: 0.5,
            revenue_change: -0.1,
            gross_margin_change: -0.1,
        };
        assert!(!thresholds.is_at_risk(&summary));

        summary.runway_months = 5.99;
        assert!(thresholds.is_at_risk(&summary));
    }

    #[test]
    fn test_dashboard_preserves_order_and_flags_risks() {
        let companies = vec![
            // Profitable, plenty of cash
            company("Atlas Labs", &[(1, 10_000.0, 3_000.0, 2_000.0, 100_000.0)]),
            CompanyActuals {
                company: "No Data".into(),
                records: Vec::new(),
            },
            // Burning 5k a month against 10k cash: 2 months of runway
            company("Crest Retail", &[(1, 5_000.0, 2_000.0, 8_000.0, 10_000.0)]),
            // Revenue down 50%
            company(
                "Beacon Health",
                &[(1, 10_000.0, 1_000.0, 1_000.0, 90_000.0), (2, 5_000.0, 500.0, 1_000.0, 90_000.0)],
            ),
        ];

        let dashboard = portfolio_dashboard(&companies, &RiskThresholds::default());
        let names: Vec<_> = dashboard.summary.iter().map(|s| s.company.as_str()).collect();
        assert_eq!(names, vec!["Atlas Labs", "Crest Retail", "Beacon Health"]);

        let risky: Vec<_> = dashboard.risks.iter().map(|s| s.company.as_str()).collect();
        assert_eq!(risky, vec!["Crest Retail", "Beacon Health"]);
    }

    #[test]
    fn test_thresholds_deserialize_with_defaults() {
        let thresholds: RiskThresholds = serde_json::from_str(r#"{"runway_risk_threshold": 12.0}"#).unwrap();
        assert_eq!(thresholds.runway_risk_threshold, 12.0);
        assert_eq!(thresholds.revenue_drop_threshold, -0.1);
    }
}
