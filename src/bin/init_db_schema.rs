use dotenvy::dotenv;
use eyre::Result;
use tracing::info;

use ai_finance_dashboard::config::Config;
use ai_finance_dashboard::db::{connection, schema};
use ai_finance_dashboard::logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME")) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    let cfg = Config::load()?;
    info!("Configuration loaded and logging initialized");

    let pool = connection::create_pool(&cfg).await?;
    info!("Database connection pool created");

    schema::init_schema(&pool).await?;
    info!("Database schema initialized");

    pool.close().await;
    Ok(())
}
