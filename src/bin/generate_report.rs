use clap::Parser;
use dotenvy::dotenv;
use eyre::Result;
use std::sync::Arc;
use tracing::info;

use ai_finance_dashboard::config::Config;
use ai_finance_dashboard::db::DbManager;
use ai_finance_dashboard::logging;
use ai_finance_dashboard::narrative::build_narrator;
use ai_finance_dashboard::period::Month;
use ai_finance_dashboard::report::ReportSynthesizer;
use ai_finance_dashboard::store::ReportStore;

/// Generate and store the report for one month, as POST /api/report would.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Month to report on, YYYY-MM
    #[arg(long, env = "REPORT_MONTH")]
    month: Month,

    /// Skip the narrative service and use the rule-based text
    #[arg(long)]
    no_narrative: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME")) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    let args = Args::parse();
    let mut cfg = Config::load()?;
    if args.no_narrative {
        cfg.narrative.enabled = false;
    }

    let store: Arc<dyn ReportStore> = Arc::new(DbManager::init(&cfg).await?);
    let synthesizer = ReportSynthesizer::new(store, build_narrator(&cfg.narrative), cfg.narrative.timeout);

    let report = synthesizer.generate(&args.month).await?;
    info!(report_id = report.report_id, risk_level = %report.risk_level, source = ?report.source, "Report generated");
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
