use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use super::ApiJson;
use crate::api::AppState;
use crate::auth::middleware::{clear_cookie, session_cookie};
use crate::error::{ReportError, Result};

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(State(state): State<Arc<AppState>>, ApiJson(req): ApiJson<LoginRequest>) -> Result<Response> {
    let login = req.login.trim();
    if login.is_empty() || req.password.is_empty() {
        return Err(ReportError::validation("login and password required"));
    }

    let Some(user) = state.auth.authenticate(login, &req.password) else {
        warn!(%login, "Failed login attempt");
        return Err(ReportError::Unauthorized("invalid login or password".to_string()));
    };

    let token = state.auth.keys.issue(&user.login, user.role)?;
    info!(login = %user.login, role = %user.role, "User logged in");

    let cookie = session_cookie(&token, state.auth.cookie_secure);
    let body = json!({ "ok": true, "login": user.login, "role": user.role });
    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

pub async fn logout(State(state): State<Arc<AppState>>) -> Response {
    let cookie = clear_cookie(state.auth.cookie_secure);
    ([(header::SET_COOKIE, cookie)], Json(json!({ "ok": true }))).into_response()
}
