use dotenvy::dotenv;
use eyre::{Result, eyre};
use std::sync::Arc;
use tracing::info;

use ai_finance_dashboard::api::{self, AppState};
use ai_finance_dashboard::auth::AuthService;
use ai_finance_dashboard::config::Config;
use ai_finance_dashboard::db::DbManager;
use ai_finance_dashboard::logging;
use ai_finance_dashboard::narrative::build_narrator;
use ai_finance_dashboard::report::ReportSynthesizer;
use ai_finance_dashboard::store::ReportStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME")) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    let cfg = Config::load()?;
    let auth = AuthService::from_config(&cfg.auth).ok_or_else(|| eyre!("AUTH_SECRET must be set"))?;
    info!(users = auth.users.len(), "Configuration loaded and logging initialized");

    let db = DbManager::init(&cfg).await?;
    info!("Database manager initialized");
    let store: Arc<dyn ReportStore> = Arc::new(db);

    let narrator = build_narrator(&cfg.narrative);
    let synthesizer = ReportSynthesizer::new(store.clone(), narrator, cfg.narrative.timeout);

    let state = Arc::new(AppState::new(store, synthesizer, auth, cfg.crm_sync_token.clone()));
    api::start_server(state, &cfg.server_address()).await?;

    Ok(())
}
