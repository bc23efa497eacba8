use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One project's raw figures for one month.
///
/// All monetary fields are already coerced: a missing store value is zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialRow {
    pub project: String,
    pub revenue: Decimal, // Revenue excluding VAT
    pub salary_workers: Decimal,
    pub salary_manager: Decimal,
    pub salary_head: Decimal,
    pub ads: Decimal,
    pub transport: Decimal,
    pub penalties: Decimal,
    pub tax: Decimal,
}

impl FinancialRow {
    pub fn costs(&self) -> Decimal {
        self.salary_workers
            + self.salary_manager
            + self.salary_head
            + self.ads
            + self.transport
            + self.penalties
            + self.tax
    }
}

/// Coarse health signal, ordered by severity so `max()` picks the worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Green,
    Yellow,
    Red,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Green => "green",
            RiskLevel::Yellow => "yellow",
            RiskLevel::Red => "red",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(RiskLevel::Green),
            "yellow" => Ok(RiskLevel::Yellow),
            "red" => Ok(RiskLevel::Red),
            other => Err(format!("unknown risk level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn risk(&self) -> RiskLevel {
        match self {
            Severity::Low => RiskLevel::Green,
            Severity::Medium => RiskLevel::Yellow,
            Severity::High => RiskLevel::Red,
        }
    }
}

/// A finding shown in the report's issue list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub title: String,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>, // Machine-readable rule name, e.g. "low_margin"
}

/// Derived, per project per period. Never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetrics {
    pub project: String,
    pub revenue: Decimal,
    pub costs: Decimal,
    pub profit: Decimal,
    pub margin: Decimal, // Fraction, 4 dp; 0 when revenue <= 0
    pub risk: RiskLevel,
    pub penalties: Decimal,
    pub ads: Decimal,
    pub labor: Decimal, // Worker payroll
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub revenue: Decimal,
    pub costs: Decimal,
    pub profit: Decimal,
    pub margin: Decimal,
}

/// Per-project metrics (sorted by project name) plus their totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodMetrics {
    pub projects: Vec<ProjectMetrics>,
    pub totals: PeriodTotals,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendDeltas {
    pub profit_delta: Decimal,
    pub margin_delta_pp: Decimal, // Percentage points
}
