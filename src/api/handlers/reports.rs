use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

use super::{ApiJson, ApiQuery, MonthQuery};
use crate::api::AppState;
use crate::error::{ReportError, Result};
use crate::report::GeneratedReport;
use crate::store::ReportDetail;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub report: GeneratedReport,
}

/// Runs the pipeline for `{ "month": "YYYY-MM" }`. Each call appends a new
/// report to the history.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<MonthQuery>,
) -> Result<Json<GenerateResponse>> {
    let month = body.required()?;
    let report = state.synthesizer.generate(&month).await?;
    Ok(Json(GenerateResponse { ok: true, report }))
}

pub async fn list(State(state): State<Arc<AppState>>, ApiQuery(query): ApiQuery<MonthQuery>) -> Result<Json<Value>> {
    let month = query.optional()?;
    let items = state.store.list_reports(month.as_ref()).await?;
    Ok(Json(json!({ "ok": true, "items": items })))
}

#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    fn report_id(&self) -> Result<i64> {
        self.id
            .as_deref()
            .map(str::trim)
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| ReportError::validation("id query param required (positive integer)"))
    }
}

async fn load(state: &AppState, query: &IdQuery) -> Result<ReportDetail> {
    let id = query.report_id()?;
    state
        .store
        .get_report(id)
        .await?
        .ok_or_else(|| ReportError::not_found(format!("report {}", id)))
}

/// Report fields at the top level and again under `item`, for clients that
/// read either shape.
pub async fn get_flat(State(state): State<Arc<AppState>>, ApiQuery(query): ApiQuery<IdQuery>) -> Result<Json<Value>> {
    let report = load(&state, &query).await?;
    Ok(Json(flatten_with_item(&report)?))
}

pub async fn get_by_id(State(state): State<Arc<AppState>>, ApiQuery(query): ApiQuery<IdQuery>) -> Result<Json<Value>> {
    let report = load(&state, &query).await?;
    Ok(Json(json!({ "ok": true, "item": report })))
}

fn flatten_with_item(report: &ReportDetail) -> Result<Value> {
    let item = serde_json::to_value(report)
        .map_err(|e| ReportError::Config(format!("report not serializable: {}", e)))?;
    let mut body = match &item {
        Value::Object(fields) => fields.clone(),
        _ => serde_json::Map::new(),
    };
    body.insert("ok".to_string(), Value::Bool(true));
    body.insert("item".to_string(), item);
    Ok(Value::Object(body))
}
