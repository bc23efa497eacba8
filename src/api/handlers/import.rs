use axum::extract::State;
use rust_decimal::Decimal;
use rust_decimal::dec;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

use super::ApiJson;
use crate::api::AppState;
use crate::error::{ReportError, Result};
use crate::store::ImportRow;

/// Figures must fit `NUMERIC(14,2)`.
pub const FIGURE_LIMIT: Decimal = dec!(1000000000000);

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub rows: Vec<ImportRow>,
}

/// Parses and checks an import payload before anything is written.
pub fn parse_import(body: Value) -> Result<Vec<ImportRow>> {
    let request: ImportRequest = serde_json::from_value(body)
        .map_err(|e| ReportError::validation(format!("invalid import payload: {}", e)))?;

    if request.rows.is_empty() {
        return Err(ReportError::validation("rows must not be empty"));
    }

    for (index, row) in request.rows.iter().enumerate() {
        if row.project.trim().is_empty() {
            return Err(ReportError::validation(format!("row {} has an empty project name", index)));
        }
        for (field, value) in row.figures() {
            if value < Decimal::ZERO {
                return Err(ReportError::validation(format!("row {}: {} must not be negative", index, field)));
            }
            if value >= FIGURE_LIMIT {
                return Err(ReportError::validation(format!(
                    "row {}: {} must be below {}",
                    index, field, FIGURE_LIMIT
                )));
            }
        }
    }

    Ok(request.rows)
}

pub async fn import_rows(State(state): State<Arc<AppState>>, ApiJson(body): ApiJson<Value>) -> Result<ApiJson<Value>> {
    let rows = parse_import(body)?;
    let upserted = state.store.upsert_financial_rows(&rows).await?;
    info!(upserted, "Import finished");
    Ok(ApiJson(json!({ "ok": true, "upserted": upserted })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<Vec<ImportRow>>) -> String {
        match result {
            Err(ReportError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other.map(|rows| rows.len())),
        }
    }

    #[test]
    fn accepts_rows_with_missing_cost_fields() {
        let rows = parse_import(json!({
            "rows": [{ "project": "Alpha", "month": "2026-01", "revenue_no_vat": 1000, "ads": null }]
        }))
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].ads.is_zero());
    }

    #[test]
    fn rejects_bad_payloads() {
        assert!(parse_import(json!({ "rows": [] })).is_err());
        assert!(parse_import(json!({ "rows": [{ "project": " ", "month": "2026-01" }] })).is_err());
        assert!(parse_import(json!({ "rows": [{ "project": "A", "month": "2026-1" }] })).is_err());
        assert!(parse_import(json!({ "items": [] })).is_err());
    }

    #[test]
    fn negative_figures_name_row_and_field() {
        let msg = message(parse_import(json!({
            "rows": [
                { "project": "A", "month": "2026-01", "revenue": 1000 },
                { "project": "B", "month": "2026-01", "revenue": 1000, "tax": -50 },
            ]
        })));
        assert!(msg.contains("row 1"));
        assert!(msg.contains("tax"));
    }

    #[test]
    fn oversized_figures_are_rejected() {
        let msg = message(parse_import(json!({
            "rows": [{ "project": "A", "month": "2026-01", "revenue": 1e15, "salary_workers": 5e13 }]
        })));
        assert!(msg.contains("row 0"));
        assert!(msg.contains("revenue"));

        // Sums of these would overflow Decimal
        assert!(parse_import(json!({
            "rows": [{ "project": "A", "month": "2026-01", "revenue": 1e28, "salary_workers": 5e28, "tax": 5e28 }]
        }))
        .is_err());

        let at_limit = parse_import(json!({
            "rows": [{ "project": "A", "month": "2026-01", "ads": 1000000000000u64 }]
        }));
        assert!(at_limit.is_err());
        assert!(parse_import(json!({
            "rows": [{ "project": "A", "month": "2026-01", "ads": 999999999999.99 }]
        }))
        .is_ok());
    }
}
