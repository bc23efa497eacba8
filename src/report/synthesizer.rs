use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use super::types::{GeneratedReport, ReportMetrics, ReportSource};
use crate::error::{ReportError, Result};
use crate::metrics::{
    PeriodMetrics, PeriodTotals, RiskLevel, compute_period, derive_issues, period_risk, trend_deltas,
    worst_projects,
};
use crate::narrative::fallback::{self, TOP_PROJECTS_LIMIT};
use crate::narrative::{NarrativeError, NarrativeInput, NarrativeResponse, Narrator};
use crate::period::Month;
use crate::store::{NewReport, ReportStore};

pub const NO_DATA_SUMMARY: &str = "No data for this month.";

/// Runs one report generation: resolve period, compute, narrate (or fall
/// back), persist.
pub struct ReportSynthesizer {
    store: Arc<dyn ReportStore>,
    narrator: Arc<dyn Narrator>,
    narrative_timeout: Duration,
}

struct Narration {
    response: NarrativeResponse,
    source: ReportSource,
    degraded_reason: Option<String>,
}

impl ReportSynthesizer {
    pub fn new(store: Arc<dyn ReportStore>, narrator: Arc<dyn Narrator>, narrative_timeout: Duration) -> Self {
        Self {
            store,
            narrator,
            narrative_timeout,
        }
    }

    #[instrument(name = "report_generation", skip(self, month), fields(month = %month, on_close = true))]
    pub async fn generate(&self, month: &Month) -> Result<GeneratedReport> {
        let period = self
            .store
            .find_period(month)
            .await?
            .ok_or_else(|| ReportError::not_found(format!("period {}", month)))?;

        let rows = self.store.load_financial_rows(period.id).await?;
        let current = compute_period(&rows);

        let report = if rows.is_empty() {
            info!("No financial rows, skipping narrative");
            no_data_report(period.id, &current, self.narrator.name())
        } else {
            let previous = self.previous_totals(month).await?;
            self.narrated_report(period.id, month, current, previous).await
        };

        let report_id = self.store.insert_report(&report).await?;
        info!(
            report_id,
            risk_level = %report.risk_level,
            source = ?report.metrics.source,
            "Report persisted"
        );

        Ok(GeneratedReport {
            report_id,
            month: month.clone(),
            risk_level: report.risk_level,
            rows: rows.len(),
            source: report.metrics.source,
            summary_text: report.summary_text,
        })
    }

    async fn previous_totals(&self, month: &Month) -> Result<Option<(Month, PeriodTotals)>> {
        let Some(previous) = self.store.find_previous_period(month).await? else {
            return Ok(None);
        };
        let rows = self.store.load_financial_rows(previous.id).await?;
        Ok(Some((previous.month, compute_period(&rows).totals)))
    }

    async fn narrated_report(
        &self,
        period_id: i32,
        month: &Month,
        current: PeriodMetrics,
        previous: Option<(Month, PeriodTotals)>,
    ) -> NewReport {
        let rule_issues = derive_issues(&current.projects);
        let risk_level = period_risk(&current.totals, &current.projects, &rule_issues);
        let (prev_month, prev_totals) = previous.unzip();

        let input = NarrativeInput {
            month: month.clone(),
            totals: current.totals,
            projects: current.projects,
            prev_totals,
            prev_month,
            issues: rule_issues,
        };

        let narration = self.narrate(&input).await;
        let narrator_risk_level = match narration.source {
            ReportSource::Ai => Some(narration.response.risk_level),
            _ => None,
        };

        let metrics = ReportMetrics {
            totals: input.totals,
            deltas: input.prev_totals.as_ref().map(|prev| trend_deltas(&input.totals, prev)),
            prev_totals: input.prev_totals,
            prev_month: input.prev_month.clone(),
            projects_count: input.projects.len(),
            top_projects: worst_projects(&input.projects, TOP_PROJECTS_LIMIT)
                .into_iter()
                .map(|p| p.project)
                .collect(),
            projects: input.projects,
            recommendations: narration.response.recommendations,
            source: narration.source,
            narrator: self.narrator.name().to_string(),
            narrator_risk_level,
            degraded_reason: narration.degraded_reason,
        };

        NewReport {
            period_id,
            risk_level,
            summary_text: narration.response.summary_text,
            issues: narration.response.issues,
            metrics,
        }
    }

    /// Never fails: any narrator problem becomes a fallback narrative.
    async fn narrate(&self, input: &NarrativeInput) -> Narration {
        let outcome = tokio::time::timeout(self.narrative_timeout, self.narrator.generate(input))
            .await
            .unwrap_or(Err(NarrativeError::Timeout(self.narrative_timeout)));

        match outcome {
            Ok(response) => Narration {
                response,
                source: ReportSource::Ai,
                degraded_reason: None,
            },
            Err(e) => {
                let reason = e.to_string();
                warn!(narrator = self.narrator.name(), error = %reason, "Narrative generation failed, using fallback");
                Narration {
                    response: fallback::synthesize(input, &reason),
                    source: ReportSource::Fallback,
                    degraded_reason: Some(reason),
                }
            }
        }
    }
}

fn no_data_report(period_id: i32, current: &PeriodMetrics, narrator: &str) -> NewReport {
    NewReport {
        period_id,
        risk_level: RiskLevel::Green,
        summary_text: NO_DATA_SUMMARY.to_string(),
        issues: Vec::new(),
        metrics: ReportMetrics {
            totals: current.totals,
            prev_totals: None,
            prev_month: None,
            deltas: None,
            projects_count: 0,
            projects: Vec::new(),
            top_projects: Vec::new(),
            recommendations: Vec::new(),
            source: ReportSource::NoData,
            narrator: narrator.to_string(),
            narrator_risk_level: None,
            degraded_reason: None,
        },
    }
}
