use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use tracing::warn;

use crate::error::ReportError;
use crate::metrics::{Issue, RiskLevel};
use crate::report::ReportMetrics;
use crate::store::{NewReport, ReportDetail};

/// An `ai_reports` record joined with its period month.
#[derive(Debug, FromRow)]
pub struct AiReportModel {
    pub id: i64,
    pub month: String,
    pub risk_level: String,
    pub summary_text: Option<String>,
    pub issues: Option<Json<serde_json::Value>>,
    pub metrics: Option<Json<serde_json::Value>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AiReportModel> for ReportDetail {
    type Error = ReportError;

    fn try_from(model: AiReportModel) -> Result<Self, Self::Error> {
        let risk_level = model.risk_level.parse().unwrap_or_else(|e| {
            warn!(report_id = model.id, error = %e, "Stored risk level unreadable, showing green");
            RiskLevel::Green
        });

        // Older rows used a different issue shape; show them without issues
        let issues: Vec<Issue> = model
            .issues
            .and_then(|Json(value)| serde_json::from_value(value).ok())
            .unwrap_or_default();

        Ok(Self {
            id: model.id,
            month: model.month.parse()?,
            risk_level,
            summary_text: model.summary_text.unwrap_or_default(),
            issues,
            metrics: model
                .metrics
                .map(|Json(value)| value)
                .unwrap_or_else(|| serde_json::json!({})),
            created_at: model.created_at,
        })
    }
}

#[derive(Debug)]
pub struct NewAiReportModel {
    pub period_id: i32,
    pub risk_level: String,
    pub summary_text: String,
    pub issues: Json<Vec<Issue>>,
    pub metrics: Json<ReportMetrics>,
}

impl From<&NewReport> for NewAiReportModel {
    fn from(report: &NewReport) -> Self {
        Self {
            period_id: report.period_id,
            risk_level: report.risk_level.as_str().to_string(),
            summary_text: report.summary_text.clone(),
            issues: Json(report.issues.clone()),
            metrics: Json(report.metrics.clone()),
        }
    }
}
