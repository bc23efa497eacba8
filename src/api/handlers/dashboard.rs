use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

use super::{ApiQuery, MonthQuery};
use crate::api::AppState;
use crate::error::Result;
use crate::metrics::{Issue, PeriodTotals, ProjectMetrics, RiskLevel, compute_period, derive_issues, period_risk};
use crate::period::Month;
use crate::store::MONTH_LIST_LIMIT;

pub async fn months(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let months = state.store.list_months(MONTH_LIST_LIMIT).await?;
    Ok(Json(json!({ "ok": true, "months": months })))
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub ok: bool,
    pub month: Month,
    pub totals: PeriodTotals,
    pub projects: Vec<ProjectMetrics>,
    pub risk_level: RiskLevel,
    pub issues: Vec<Issue>,
}

/// Live metrics for one month, computed from the stored rows on every call.
/// A month without a period or rows yields zero totals and no projects.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<DashboardResponse>> {
    let month = query.required()?;

    let rows = match state.store.find_period(&month).await? {
        Some(period) => state.store.load_financial_rows(period.id).await?,
        None => {
            debug!(%month, "Dashboard requested for unknown month");
            Vec::new()
        }
    };

    let metrics = compute_period(&rows);
    let issues = derive_issues(&metrics.projects);
    let risk_level = period_risk(&metrics.totals, &metrics.projects, &issues);

    Ok(Json(DashboardResponse {
        ok: true,
        month,
        totals: metrics.totals,
        projects: metrics.projects,
        risk_level,
        issues,
    }))
}
