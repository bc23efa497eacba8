//! KPI computation: per-project metrics, period totals, risk tiers and the
//! rule-derived issue list.

pub mod aggregator;
pub mod issues;
pub mod risk;
pub mod types;

pub use aggregator::{compute_period, compute_project, compute_totals, trend_deltas, worst_projects};
pub use issues::derive_issues;
pub use risk::{aggregate_risk, period_risk, project_risk};
pub use types::{
    FinancialRow, Issue, PeriodMetrics, PeriodTotals, ProjectMetrics, RiskLevel, Severity, TrendDeltas,
};
