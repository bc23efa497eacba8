use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{ImportRow, NewReport, PeriodRef, REPORT_LIST_LIMIT, ReportDetail, ReportStore, ReportSummary};
use crate::error::{ReportError, Result};
use crate::metrics::FinancialRow;
use crate::period::Month;

#[derive(Default)]
struct Inner {
    periods: BTreeMap<Month, i32>,
    rows: BTreeMap<(i32, String), FinancialRow>, // (period_id, project)
    reports: Vec<ReportDetail>,
}

/// In-process [`ReportStore`] with the same semantics as the database one.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a period without rows, as a sync that found nothing would.
    pub async fn add_empty_period(&self, month: &Month) -> i32 {
        let mut inner = self.inner.write().await;
        ensure_period(&mut inner, month)
    }

    pub async fn report_count(&self) -> usize {
        self.inner.read().await.reports.len()
    }
}

fn ensure_period(inner: &mut Inner, month: &Month) -> i32 {
    let next_id = inner.periods.len() as i32 + 1;
    *inner.periods.entry(month.clone()).or_insert(next_id)
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn find_period(&self, month: &Month) -> Result<Option<PeriodRef>> {
        let inner = self.inner.read().await;
        Ok(inner.periods.get(month).map(|&id| PeriodRef { id, month: month.clone() }))
    }

    async fn find_previous_period(&self, month: &Month) -> Result<Option<PeriodRef>> {
        let inner = self.inner.read().await;
        let previous = inner
            .periods
            .range(..month.clone())
            .rev()
            .find(|&(_, &id)| inner.rows.keys().any(|(period_id, _)| *period_id == id))
            .map(|(m, &id)| PeriodRef { id, month: m.clone() });
        Ok(previous)
    }

    async fn load_financial_rows(&self, period_id: i32) -> Result<Vec<FinancialRow>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .iter()
            .filter(|((id, _), _)| *id == period_id)
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn insert_report(&self, report: &NewReport) -> Result<i64> {
        let mut inner = self.inner.write().await;
        let month = inner
            .periods
            .iter()
            .find(|&(_, &id)| id == report.period_id)
            .map(|(m, _)| m.clone())
            .ok_or_else(|| ReportError::not_found(format!("period {}", report.period_id)))?;
        let metrics = serde_json::to_value(&report.metrics)
            .map_err(|e| ReportError::Config(format!("metrics not serializable: {}", e)))?;

        let id = inner.reports.len() as i64 + 1;
        inner.reports.push(ReportDetail {
            id,
            month,
            risk_level: report.risk_level,
            summary_text: report.summary_text.clone(),
            issues: report.issues.clone(),
            metrics,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_reports(&self, month: Option<&Month>) -> Result<Vec<ReportSummary>> {
        let inner = self.inner.read().await;
        Ok(inner
            .reports
            .iter()
            .rev()
            .filter(|r| month.is_none_or(|m| &r.month == m))
            .take(REPORT_LIST_LIMIT as usize)
            .cloned()
            .collect())
    }

    async fn get_report(&self, id: i64) -> Result<Option<ReportDetail>> {
        let inner = self.inner.read().await;
        Ok(inner.reports.iter().find(|r| r.id == id).cloned())
    }

    async fn list_months(&self, limit: i64) -> Result<Vec<Month>> {
        let inner = self.inner.read().await;
        Ok(inner.periods.keys().rev().take(limit.max(0) as usize).cloned().collect())
    }

    async fn upsert_financial_rows(&self, rows: &[ImportRow]) -> Result<usize> {
        let mut inner = self.inner.write().await;
        for row in rows {
            let period_id = ensure_period(&mut inner, &row.month);
            let financial_row = row.to_financial_row();
            inner
                .rows
                .insert((period_id, financial_row.project.clone()), financial_row);
        }
        Ok(rows.len())
    }
}
