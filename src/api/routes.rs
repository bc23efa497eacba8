use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{handlers, state::AppState};
use crate::auth::require_session;

/// Builds the full router with session checks and HTTP tracing applied.
pub fn create_router(state: Arc<AppState>) -> Router {
    let auth = state.auth.clone();

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/months", get(handlers::dashboard::months))
        .route("/api/dashboard", get(handlers::dashboard::dashboard))
        .route("/api/report", post(handlers::reports::generate))
        .route("/api/reports_list", get(handlers::reports::list))
        .route("/api/report_get", get(handlers::reports::get_flat))
        .route("/api/report_by_id", get(handlers::reports::get_by_id))
        .route("/api/import", post(handlers::import::import_rows))
        .route("/api/ping", post(handlers::health::ping))
        .route("/api/sync_ping", get(handlers::health::sync_ping))
        .with_state(state)
        .layer(middleware::from_fn_with_state(auth, require_session))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server(state: Arc<AppState>, bind_addr: &str) -> Result<(), std::io::Error> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(%bind_addr, "Dashboard API listening");
    axum::serve(listener, app).await
}
