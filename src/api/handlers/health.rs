use axum::{Json, extract::State, http::HeaderMap};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::api::AppState;
use crate::auth::users::constant_time_eq;

pub const SYNC_TOKEN_HEADER: &str = "x-crm-sync-token";

pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "status": "healthy" }))
}

/// Echoes whatever JSON was posted, or `null` for an empty body.
pub async fn ping(body: Option<Json<Value>>) -> Json<Value> {
    let got = body.map(|Json(v)| v).unwrap_or(Value::Null);
    Json(json!({ "ok": true, "got": got }))
}

/// Diagnostic view of the CRM sync token. Never reveals either token.
#[derive(Debug, Serialize, PartialEq)]
pub struct SyncPing {
    pub ok: bool,
    pub has_env_token: bool,
    pub env_len: usize,
    pub header_present: bool,
    pub header_len: usize,
    #[serde(rename = "match")]
    pub matches: bool,
}

impl SyncPing {
    pub fn compare(configured: Option<&str>, presented: Option<&str>) -> Self {
        let configured = configured.map(str::trim).unwrap_or_default();
        let presented = presented.map(str::trim).unwrap_or_default();
        Self {
            ok: true,
            has_env_token: !configured.is_empty(),
            env_len: configured.len(),
            header_present: !presented.is_empty(),
            header_len: presented.len(),
            matches: !configured.is_empty() && !presented.is_empty() && constant_time_eq(configured, presented),
        }
    }
}

pub async fn sync_ping(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<SyncPing> {
    let presented = headers.get(SYNC_TOKEN_HEADER).and_then(|v| v.to_str().ok());
    Json(SyncPing::compare(state.crm_sync_token.as_deref(), presented))
}
