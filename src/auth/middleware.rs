use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use super::AuthService;
use super::policy::Access;
use super::token::SESSION_TTL_SECS;
use crate::error::ReportError;

pub const SESSION_COOKIE: &str = "ai_finance_session";

/// Value of cookie `name` across every `Cookie` header of the request.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, SESSION_TTL_SECS
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_cookie(secure: bool) -> String {
    let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Gatekeeper in front of every route. Public paths pass through untouched;
/// protected ones need a valid session whose role ranks high enough.
pub async fn require_session(
    State(auth): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let required = match auth.policy.required_access(&path) {
        Access::Public => return next.run(request).await,
        Access::AtLeast(role) => role,
    };

    let Some(token) = cookie_value(request.headers(), SESSION_COOKIE) else {
        debug!(%path, "No session cookie");
        return ReportError::Unauthorized("login required".to_string()).into_response();
    };

    let claims = match auth.keys.verify(&token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(%path, error = %e, "Rejected session");
            return e.into_response();
        }
    };

    if !claims.role.satisfies(required) {
        debug!(%path, login = %claims.login, role = %claims.role, required = %required, "Role too low");
        return ReportError::Forbidden.into_response();
    }

    let role = HeaderValue::from_static(claims.role.as_str());
    let login = HeaderValue::from_str(&claims.login).ok();
    request.extensions_mut().insert(claims);

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("x-user-role", role);
    if let Some(login) = login {
        headers.insert("x-user-login", login);
    }
    response
}
