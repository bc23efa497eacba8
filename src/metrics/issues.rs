use rust_decimal::Decimal;
use rust_decimal::dec;

use super::aggregator::worst_projects;
use super::types::{Issue, ProjectMetrics, RiskLevel, Severity};

const ADS_SHARE_LIMIT: Decimal = dec!(0.12);
const LABOR_SHARE_LIMIT: Decimal = dec!(0.60);
const WEAKEST_PROJECTS_LISTED: usize = 3;

fn percent(fraction: Decimal) -> String {
    format!("{:.1}%", fraction * dec!(100))
}

fn share(part: Decimal, revenue: Decimal) -> Option<Decimal> {
    if revenue > Decimal::ZERO {
        part.checked_div(revenue)
    } else {
        None
    }
}

/// Rule-derived issues for a period, in project order.
pub fn derive_issues(projects: &[ProjectMetrics]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for p in projects {
        if p.revenue > Decimal::ZERO {
            let severity = match p.risk {
                RiskLevel::Red => Some(Severity::High),
                RiskLevel::Yellow if p.margin < super::risk::YELLOW_MARGIN_BELOW => Some(Severity::Medium),
                _ => None,
            };
            if let Some(severity) = severity {
                issues.push(Issue {
                    severity,
                    title: format!("Low margin on {}", p.project),
                    details: format!(
                        "Margin is {} on revenue {} (profit {}).",
                        percent(p.margin),
                        p.revenue,
                        p.profit
                    ),
                    project: Some(p.project.clone()),
                    kind: Some("low_margin".to_string()),
                });
            }
        }

        if p.penalties > Decimal::ZERO {
            issues.push(Issue {
                severity: Severity::Medium,
                title: format!("Penalties on {}", p.project),
                details: format!("Penalties of {} were charged this month.", p.penalties),
                project: Some(p.project.clone()),
                kind: Some("penalties".to_string()),
            });
        }

        if let Some(ads_share) = share(p.ads, p.revenue).filter(|s| *s > ADS_SHARE_LIMIT) {
            issues.push(Issue {
                severity: Severity::Medium,
                title: format!("Advertising share is high on {}", p.project),
                details: format!(
                    "Advertising is {} of revenue (limit {}).",
                    percent(ads_share),
                    percent(ADS_SHARE_LIMIT)
                ),
                project: Some(p.project.clone()),
                kind: Some("ads_high".to_string()),
            });
        }

        if let Some(labor_share) = share(p.labor, p.revenue).filter(|s| *s > LABOR_SHARE_LIMIT) {
            issues.push(Issue {
                severity: Severity::High,
                title: format!("Worker payroll share is high on {}", p.project),
                details: format!(
                    "Worker payroll is {} of revenue (limit {}).",
                    percent(labor_share),
                    percent(LABOR_SHARE_LIMIT)
                ),
                project: Some(p.project.clone()),
                kind: Some("labor_high".to_string()),
            });
        }
    }

    if projects.len() > 1 {
        let weakest = worst_projects(projects, WEAKEST_PROJECTS_LISTED);
        let listed: Vec<String> = weakest
            .iter()
            .map(|p| format!("{} ({})", p.project, percent(p.margin)))
            .collect();
        issues.push(Issue {
            severity: Severity::Low,
            title: "Weakest projects by margin".to_string(),
            details: listed.join(", "),
            project: None,
            kind: Some("bottom_margin".to_string()),
        });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::aggregator::compute_project;
    use crate::metrics::types::FinancialRow;

    fn metrics(project: &str, revenue: Decimal, workers: Decimal, ads: Decimal, penalties: Decimal) -> ProjectMetrics {
        compute_project(&FinancialRow {
            project: project.to_string(),
            revenue,
            salary_workers: workers,
            ads,
            penalties,
            ..Default::default()
        })
    }

    fn kinds(issues: &[Issue]) -> Vec<&str> {
        issues.iter().filter_map(|i| i.kind.as_deref()).collect()
    }

    #[test]
    fn healthy_single_project_has_no_issues() {
        let issues = derive_issues(&[metrics("Alpha", dec!(1000), dec!(300), dec!(50), Decimal::ZERO)]);
        assert!(issues.is_empty());
    }

    #[test]
    fn red_project_gets_high_low_margin_issue() {
        let issues = derive_issues(&[metrics("Alpha", dec!(1000), dec!(500), dec!(450), Decimal::ZERO)]);
        let low_margin = issues.iter().find(|i| i.kind.as_deref() == Some("low_margin")).unwrap();
        assert_eq!(low_margin.severity, Severity::High);
        assert_eq!(low_margin.project.as_deref(), Some("Alpha"));
    }

    #[test]
    fn penalty_only_yellow_is_not_a_margin_issue() {
        let issues = derive_issues(&[metrics("Alpha", dec!(1000), dec!(300), Decimal::ZERO, dec!(10))]);
        assert_eq!(kinds(&issues), vec!["penalties"]);
    }

    #[test]
    fn cost_structure_rules_fire() {
        let issues = derive_issues(&[metrics("Alpha", dec!(1000), dec!(610), dec!(130), Decimal::ZERO)]);
        let k = kinds(&issues);
        assert!(k.contains(&"ads_high"));
        assert!(k.contains(&"labor_high"));
    }

    #[test]
    fn heavy_worker_payroll_turns_period_red() {
        // 35% margin is green on its own
        let projects = vec![metrics("Alpha", dec!(1000), dec!(650), Decimal::ZERO, Decimal::ZERO)];
        assert_eq!(projects[0].risk, RiskLevel::Green);

        let issues = derive_issues(&projects);
        let labor = issues.iter().find(|i| i.kind.as_deref() == Some("labor_high")).unwrap();
        assert_eq!(labor.severity, Severity::High);

        let totals = crate::metrics::compute_totals(&projects);
        assert_eq!(crate::metrics::period_risk(&totals, &projects, &issues), RiskLevel::Red);
    }

    #[test]
    fn tier_and_margin_issue_agree_at_rounding_edge() {
        // Raw margin 0.19996 rounds to 0.2000
        let edge = compute_project(&FinancialRow {
            project: "Edge".to_string(),
            revenue: dec!(100000),
            tax: dec!(80004),
            ..Default::default()
        });
        assert_eq!(edge.margin, dec!(0.2000));
        assert_eq!(edge.risk, RiskLevel::Green);
        assert!(derive_issues(&[edge]).is_empty());
    }

    #[test]
    fn zero_revenue_projects_skip_share_rules() {
        let issues = derive_issues(&[metrics("Idle", Decimal::ZERO, dec!(200), dec!(50), Decimal::ZERO)]);
        assert!(issues.is_empty());
    }

    #[test]
    fn several_projects_list_the_weakest() {
        let issues = derive_issues(&[
            metrics("A", dec!(1000), dec!(100), Decimal::ZERO, Decimal::ZERO),
            metrics("B", dec!(1000), dec!(200), Decimal::ZERO, Decimal::ZERO),
        ]);
        let bottom = issues.last().unwrap();
        assert_eq!(bottom.kind.as_deref(), Some("bottom_margin"));
        assert_eq!(bottom.severity, Severity::Low);
        assert!(bottom.details.starts_with("B (80.0%)"));
    }
}
