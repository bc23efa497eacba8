use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use super::connection;
use super::schema;
use super::queries::{
    periods as periods_queries,
    projects as projects_queries,
    financial_rows as financial_rows_queries,
    ai_reports as ai_reports_queries,
};
use super::models::{
    financial_rows::NewFinancialRowModel,
    ai_reports::NewAiReportModel,
};
use crate::config::Config;
use crate::error::Result;
use crate::metrics::FinancialRow;
use crate::period::Month;
use crate::store::{ImportRow, NewReport, PeriodRef, REPORT_LIST_LIMIT, ReportDetail, ReportStore, ReportSummary};

/// PostgreSQL-backed [`ReportStore`].
#[derive(Clone)]
pub struct DbManager {
    pub pool: PgPool,
}

impl DbManager {
    /// Creates a new database connection and initializes the schema
    pub async fn init(config: &Config) -> std::result::Result<Self, sqlx::Error> {
        let pool = connection::create_pool(config).await?;

        // Ensure schema is initialized (creates tables if needed)
        schema::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn period_ref(id: i32, month: String) -> Option<PeriodRef> {
    match month.parse() {
        Ok(month) => Some(PeriodRef { id, month }),
        Err(e) => {
            warn!(period_id = id, error = %e, "Skipping period with malformed month");
            None
        }
    }
}

#[async_trait]
impl ReportStore for DbManager {
    async fn find_period(&self, month: &Month) -> Result<Option<PeriodRef>> {
        let period = periods_queries::get_period_by_month(&self.pool, month.as_str()).await?;
        Ok(period.and_then(|p| period_ref(p.id, p.month)))
    }

    async fn find_previous_period(&self, month: &Month) -> Result<Option<PeriodRef>> {
        let period = periods_queries::get_previous_period_with_rows(&self.pool, month.as_str()).await?;
        Ok(period.and_then(|p| period_ref(p.id, p.month)))
    }

    async fn load_financial_rows(&self, period_id: i32) -> Result<Vec<FinancialRow>> {
        let rows = financial_rows_queries::get_rows_for_period(&self.pool, period_id).await?;
        Ok(rows.into_iter().map(FinancialRow::from).collect())
    }

    async fn insert_report(&self, report: &NewReport) -> Result<i64> {
        let model = NewAiReportModel::from(report);
        Ok(ai_reports_queries::insert_ai_report(&self.pool, &model).await?)
    }

    async fn list_reports(&self, month: Option<&Month>) -> Result<Vec<ReportSummary>> {
        let rows = ai_reports_queries::list_ai_reports(&self.pool, month.map(Month::as_str), REPORT_LIST_LIMIT).await?;
        rows.into_iter().map(ReportDetail::try_from).collect()
    }

    async fn get_report(&self, id: i64) -> Result<Option<ReportDetail>> {
        ai_reports_queries::get_ai_report(&self.pool, id)
            .await?
            .map(ReportDetail::try_from)
            .transpose()
    }

    async fn list_months(&self, limit: i64) -> Result<Vec<Month>> {
        let months = periods_queries::list_months(&self.pool, limit).await?;
        Ok(months.into_iter().filter_map(|m| m.parse().ok()).collect())
    }

    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn upsert_financial_rows(&self, rows: &[ImportRow]) -> Result<usize> {
        // One transaction so a failed import leaves no partial month behind
        let mut tx = self.pool.begin().await?;

        for row in rows {
            let project_id = projects_queries::upsert_project(&mut tx, row.project.trim()).await?;
            let period_id = periods_queries::upsert_period(&mut tx, row.month.as_str()).await?;
            let model = NewFinancialRowModel::from(row, project_id, period_id);
            financial_rows_queries::upsert_financial_row(&mut tx, &model).await?;
        }

        tx.commit().await?;
        info!(count = rows.len(), "Financial rows upserted");
        Ok(rows.len())
    }
}
