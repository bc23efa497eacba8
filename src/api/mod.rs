//! HTTP surface: session auth in front of the dashboard and report routes.

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::{create_router, start_server};
pub use state::AppState;
