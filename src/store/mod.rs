//! Persistence boundary of the report pipeline.
//!
//! [`crate::db::DbManager`] implements it over PostgreSQL; [`MemoryStore`]
//! keeps everything in process for tests and local dry runs.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::metrics::{FinancialRow, Issue, RiskLevel};
use crate::period::Month;
use crate::report::ReportMetrics;

pub use memory::MemoryStore;

pub const REPORT_LIST_LIMIT: i64 = 50;
pub const MONTH_LIST_LIMIT: i64 = 36;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodRef {
    pub id: i32,
    pub month: Month,
}

/// A report ready to be written. Computed fully in memory first.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub period_id: i32,
    pub risk_level: RiskLevel,
    pub summary_text: String,
    pub issues: Vec<Issue>,
    pub metrics: ReportMetrics,
}

/// A persisted report as the UI renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDetail {
    pub id: i64,
    pub month: Month,
    pub risk_level: RiskLevel,
    pub summary_text: String,
    pub issues: Vec<Issue>,
    pub metrics: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Report list entries carry the same fields as the detail view.
pub type ReportSummary = ReportDetail;

/// One incoming row for the import endpoint. Missing figures are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    pub project: String,
    pub month: Month,
    #[serde(default, alias = "revenue_no_vat", deserialize_with = "null_as_zero")]
    pub revenue: Decimal,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub salary_workers: Decimal,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub salary_manager: Decimal,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub salary_head: Decimal,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub ads: Decimal,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub transport: Decimal,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub penalties: Decimal,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub tax: Decimal,
}

/// Explicit `null` figures count as missing, like absent ones.
fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Decimal, D::Error> {
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or_default())
}

impl ImportRow {
    /// Every figure with its wire name, revenue first.
    pub fn figures(&self) -> [(&'static str, Decimal); 8] {
        [
            ("revenue", self.revenue),
            ("salary_workers", self.salary_workers),
            ("salary_manager", self.salary_manager),
            ("salary_head", self.salary_head),
            ("ads", self.ads),
            ("transport", self.transport),
            ("penalties", self.penalties),
            ("tax", self.tax),
        ]
    }

    pub fn to_financial_row(&self) -> FinancialRow {
        FinancialRow {
            project: self.project.trim().to_string(),
            revenue: self.revenue,
            salary_workers: self.salary_workers,
            salary_manager: self.salary_manager,
            salary_head: self.salary_head,
            ads: self.ads,
            transport: self.transport,
            penalties: self.penalties,
            tax: self.tax,
        }
    }
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn find_period(&self, month: &Month) -> Result<Option<PeriodRef>>;

    /// Nearest earlier period that has at least one financial row.
    async fn find_previous_period(&self, month: &Month) -> Result<Option<PeriodRef>>;

    async fn load_financial_rows(&self, period_id: i32) -> Result<Vec<FinancialRow>>;

    async fn insert_report(&self, report: &NewReport) -> Result<i64>;

    /// Most recent first, at most [`REPORT_LIST_LIMIT`].
    async fn list_reports(&self, month: Option<&Month>) -> Result<Vec<ReportSummary>>;

    async fn get_report(&self, id: i64) -> Result<Option<ReportDetail>>;

    /// Most recent first, at most `limit`.
    async fn list_months(&self, limit: i64) -> Result<Vec<Month>>;

    /// Creates projects and periods as needed and replaces existing
    /// `(project, month)` rows. Returns the number of rows written.
    async fn upsert_financial_rows(&self, rows: &[ImportRow]) -> Result<usize>;
}
