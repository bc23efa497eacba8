pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod narrative;
pub mod period;
pub mod report;
pub mod store;
