use serde::{Deserialize, Serialize};

use super::NarrativeError;
use crate::metrics::{Issue, PeriodTotals, ProjectMetrics, RiskLevel};
use crate::period::Month;

/// Everything the narrator gets to see. Serialized verbatim as the user
/// message, so field names are part of the prompt contract.
#[derive(Debug, Clone, Serialize)]
pub struct NarrativeInput {
    pub month: Month,
    pub totals: PeriodTotals,
    pub projects: Vec<ProjectMetrics>,
    #[serde(rename = "prevTotals", skip_serializing_if = "Option::is_none")]
    pub prev_totals: Option<PeriodTotals>,
    #[serde(rename = "prevMonth", skip_serializing_if = "Option::is_none")]
    pub prev_month: Option<Month>,
    pub issues: Vec<Issue>, // Rule findings
}

/// Structured narrator output. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeResponse {
    pub risk_level: RiskLevel,
    pub summary_text: String,
    pub issues: Vec<Issue>,
    pub recommendations: Vec<String>,
    pub top_projects: Vec<String>,
    pub metrics: serde_json::Value,
}

impl NarrativeResponse {
    /// Checks what the JSON shape alone cannot.
    pub fn validate(self) -> Result<Self, NarrativeError> {
        if self.summary_text.trim().is_empty() {
            return Err(NarrativeError::Invalid("summary_text is empty".to_string()));
        }
        if !self.metrics.is_object() {
            return Err(NarrativeError::Invalid("metrics is not an object".to_string()));
        }
        Ok(self)
    }
}
