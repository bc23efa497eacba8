//! Deterministic narrative used whenever the narrator cannot deliver.
//!
//! Everything here is total: no I/O and no error paths. The output has the
//! same shape as a narrator response so the synthesizer persists both alike.

use rust_decimal::Decimal;
use rust_decimal::dec;
use serde_json::json;

use super::{NarrativeInput, NarrativeResponse};
use crate::metrics::{Issue, RiskLevel, Severity, period_risk, trend_deltas, worst_projects};

pub const TOP_PROJECTS_LIMIT: usize = 5;

pub fn synthesize(input: &NarrativeInput, reason: &str) -> NarrativeResponse {
    let risk_level = period_risk(&input.totals, &input.projects, &input.issues);

    let mut issues = input.issues.clone();
    issues.push(Issue {
        severity: Severity::Low,
        title: "Narrative service degraded".to_string(),
        details: format!("The AI narrative could not be produced: {}", reason),
        project: None,
        kind: Some("service_degraded".to_string()),
    });

    let worst = worst_projects(&input.projects, TOP_PROJECTS_LIMIT);

    NarrativeResponse {
        risk_level,
        summary_text: summary_text(input, risk_level),
        issues,
        recommendations: recommendations(input, reason),
        top_projects: worst.iter().map(|p| p.project.clone()).collect(),
        metrics: json!({
            "revenue": input.totals.revenue,
            "costs": input.totals.costs,
            "profit": input.totals.profit,
            "margin": input.totals.margin,
        }),
    }
}

fn pct(fraction: Decimal) -> String {
    format!("{:.1}%", fraction * dec!(100))
}

fn summary_text(input: &NarrativeInput, risk_level: RiskLevel) -> String {
    if input.projects.is_empty() {
        return format!("No project data for {}. Overall risk is {}.", input.month, risk_level);
    }

    let t = &input.totals;
    let count = |level: RiskLevel| input.projects.iter().filter(|p| p.risk == level).count();

    let mut text = format!(
        "Rule-based summary for {}: revenue {}, costs {}, profit {}, margin {}. Overall risk is {}. \
         Of {} projects, {} are red and {} yellow.",
        input.month,
        t.revenue,
        t.costs,
        t.profit,
        pct(t.margin),
        risk_level,
        input.projects.len(),
        count(RiskLevel::Red),
        count(RiskLevel::Yellow),
    );

    if let (Some(prev), Some(prev_month)) = (&input.prev_totals, &input.prev_month) {
        let deltas = trend_deltas(t, prev);
        text.push_str(&format!(
            " Compared with {}, profit changed by {} and margin by {} pp.",
            prev_month, deltas.profit_delta, deltas.margin_delta_pp
        ));
    }

    text
}

fn recommendations(input: &NarrativeInput, reason: &str) -> Vec<String> {
    let mut recs = vec![
        format!(
            "AI narrative unavailable ({}); this report was generated from rules only.",
            reason
        ),
        "Retry report generation later to obtain the full narrative.".to_string(),
    ];

    for p in worst_projects(&input.projects, TOP_PROJECTS_LIMIT)
        .iter()
        .filter(|p| p.risk == RiskLevel::Red)
    {
        recs.push(format!("Review the cost structure of {} (margin {}).", p.project, pct(p.margin)));
    }

    let penalised: Vec<&str> = input
        .projects
        .iter()
        .filter(|p| p.penalties > Decimal::ZERO)
        .map(|p| p.project.as_str())
        .collect();
    if !penalised.is_empty() {
        recs.push(format!("Investigate the causes of penalties on: {}.", penalised.join(", ")));
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{FinancialRow, PeriodTotals, compute_period, derive_issues};

    fn input_for(rows: &[FinancialRow]) -> NarrativeInput {
        let period = compute_period(rows);
        NarrativeInput {
            month: "2026-03".parse().unwrap(),
            issues: derive_issues(&period.projects),
            totals: period.totals,
            projects: period.projects,
            prev_totals: None,
            prev_month: None,
        }
    }

    fn row(project: &str, revenue: Decimal, workers: Decimal) -> FinancialRow {
        FinancialRow {
            project: project.to_string(),
            revenue,
            salary_workers: workers,
            ..Default::default()
        }
    }

    #[test]
    fn zero_projects_still_produce_a_report() {
        let report = synthesize(&input_for(&[]), "no API key configured");
        assert!(!report.summary_text.is_empty());
        assert_eq!(report.risk_level, RiskLevel::Green);
        assert!(report.top_projects.is_empty());
    }

    #[test]
    fn documents_the_degradation() {
        let report = synthesize(&input_for(&[row("A", dec!(100), dec!(50))]), "service returned status 500");
        assert!(report.recommendations[0].contains("status 500"));
        assert!(report.recommendations.iter().any(|r| r.contains("Retry")));
        let degraded = report.issues.last().unwrap();
        assert_eq!(degraded.kind.as_deref(), Some("service_degraded"));
        assert_eq!(degraded.severity, Severity::Low);
    }

    #[test]
    fn risk_comes_from_rules() {
        let report = synthesize(
            &input_for(&[row("Good", dec!(1000), dec!(300)), row("Bad", dec!(1000), dec!(950))]),
            "timeout",
        );
        assert_eq!(report.risk_level, RiskLevel::Red);
        assert_eq!(report.top_projects, vec!["Bad".to_string(), "Good".to_string()]);
        assert!(report.recommendations.iter().any(|r| r.contains("Bad")));
    }

    #[test]
    fn mentions_trend_when_previous_month_known() {
        let mut input = input_for(&[row("A", dec!(1000), dec!(700))]);
        input.prev_month = Some("2026-02".parse().unwrap());
        input.prev_totals = Some(PeriodTotals {
            revenue: dec!(1000),
            costs: dec!(800),
            profit: dec!(200),
            margin: dec!(0.2),
        });
        let report = synthesize(&input, "disabled");
        assert!(report.summary_text.contains("Compared with 2026-02"));
    }
}
