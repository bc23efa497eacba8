use serde::{Deserialize, Serialize};

use crate::metrics::{PeriodTotals, ProjectMetrics, RiskLevel, TrendDeltas};
use crate::period::Month;

/// How the narrative of a report was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    Ai,
    Fallback,
    NoData,
}

/// Snapshot stored with every report: enough to redraw the KPI cards and
/// to audit what the narrative was based on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetrics {
    pub totals: PeriodTotals,
    #[serde(rename = "prevTotals", default, skip_serializing_if = "Option::is_none")]
    pub prev_totals: Option<PeriodTotals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_month: Option<Month>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deltas: Option<TrendDeltas>,
    pub projects_count: usize,
    pub projects: Vec<ProjectMetrics>,
    pub top_projects: Vec<String>,
    pub recommendations: Vec<String>,
    pub source: ReportSource,
    pub narrator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrator_risk_level: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
}

/// Result of one pipeline run, returned to the caller after persisting.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReport {
    pub report_id: i64,
    pub month: Month,
    pub risk_level: RiskLevel,
    pub rows: usize,
    pub source: ReportSource,
    pub summary_text: String,
}
