use rust_decimal::Decimal;
use rust_decimal::dec;

use super::types::{Issue, PeriodTotals, ProjectMetrics, RiskLevel};

pub const RED_MARGIN_BELOW: Decimal = dec!(0.10);
pub const YELLOW_MARGIN_BELOW: Decimal = dec!(0.20);

/// Risk tier of a single project.
///
/// Margin rules only apply when there is revenue. Penalties lift a clean
/// green to yellow but never touch yellow or red.
pub fn project_risk(revenue: Decimal, margin: Decimal, penalties: Decimal) -> RiskLevel {
    let mut risk = RiskLevel::Green;

    if revenue > Decimal::ZERO {
        if margin < RED_MARGIN_BELOW {
            risk = RiskLevel::Red;
        } else if margin < YELLOW_MARGIN_BELOW {
            risk = RiskLevel::Yellow;
        }
    }

    if penalties > Decimal::ZERO && risk == RiskLevel::Green {
        risk = RiskLevel::Yellow;
    }

    risk
}

/// Worst tier present; green for an empty input.
pub fn aggregate_risk<I>(levels: I) -> RiskLevel
where
    I: IntoIterator<Item = RiskLevel>,
{
    levels.into_iter().max().unwrap_or(RiskLevel::Green)
}

/// Overall tier of a period: the totals' own tier, every project tier and
/// every issue severity, whichever is worst.
pub fn period_risk(totals: &PeriodTotals, projects: &[ProjectMetrics], issues: &[Issue]) -> RiskLevel {
    let total_penalties: Decimal = projects.iter().map(|p| p.penalties).sum();
    let totals_risk = project_risk(totals.revenue, totals.margin, total_penalties);

    aggregate_risk(
        std::iter::once(totals_risk)
            .chain(projects.iter().map(|p| p.risk))
            .chain(issues.iter().map(|i| i.severity.risk())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::types::Severity;
    use proptest::prelude::*;

    #[test]
    fn low_margin_is_red() {
        // revenue 100000, costs 95000
        assert_eq!(project_risk(dec!(100000), dec!(0.05), Decimal::ZERO), RiskLevel::Red);
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(project_risk(dec!(100), dec!(0.10), Decimal::ZERO), RiskLevel::Yellow);
        assert_eq!(project_risk(dec!(100), dec!(0.20), Decimal::ZERO), RiskLevel::Green);
    }

    #[test]
    fn penalties_promote_green_to_yellow() {
        assert_eq!(project_risk(dec!(100000), dec!(0.30), Decimal::ZERO), RiskLevel::Green);
        assert_eq!(project_risk(dec!(100000), dec!(0.30), dec!(500)), RiskLevel::Yellow);
    }

    #[test]
    fn penalties_never_downgrade_red() {
        assert_eq!(project_risk(dec!(100000), dec!(0.01), dec!(500)), RiskLevel::Red);
    }

    #[test]
    fn zero_revenue_skips_margin_rules() {
        assert_eq!(project_risk(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO), RiskLevel::Green);
        assert_eq!(project_risk(Decimal::ZERO, Decimal::ZERO, dec!(10)), RiskLevel::Yellow);
    }

    #[test]
    fn one_red_project_makes_period_red() {
        let levels = [RiskLevel::Green, RiskLevel::Red, RiskLevel::Green, RiskLevel::Yellow];
        assert_eq!(aggregate_risk(levels), RiskLevel::Red);
        assert_eq!(aggregate_risk(Vec::new()), RiskLevel::Green);
    }

    #[test]
    fn period_risk_counts_issue_severity() {
        let totals = PeriodTotals {
            revenue: dec!(1000),
            costs: dec!(500),
            profit: dec!(500),
            margin: dec!(0.5),
        };
        let issue = Issue {
            severity: Severity::Medium,
            title: "Advertising share is high".into(),
            details: String::new(),
            project: None,
            kind: None,
        };
        assert_eq!(period_risk(&totals, &[], &[]), RiskLevel::Green);
        assert_eq!(period_risk(&totals, &[], &[issue]), RiskLevel::Yellow);
    }

    fn risk_strategy() -> impl Strategy<Value = RiskLevel> {
        prop_oneof![Just(RiskLevel::Green), Just(RiskLevel::Yellow), Just(RiskLevel::Red)]
    }

    proptest! {
        #[test]
        fn prop_risk_is_monotonic_in_margin(
            revenue_cents in 1i64..1_000_000_000,
            a_bp in -20_000i64..20_000,
            b_bp in -20_000i64..20_000,
        ) {
            let revenue = Decimal::new(revenue_cents, 2);
            let (low, high) = if a_bp <= b_bp { (a_bp, b_bp) } else { (b_bp, a_bp) };
            let risk_low = project_risk(revenue, Decimal::new(low, 4), Decimal::ZERO);
            let risk_high = project_risk(revenue, Decimal::new(high, 4), Decimal::ZERO);
            prop_assert!(risk_low >= risk_high);
        }

        #[test]
        fn prop_aggregate_is_max_severity(levels in proptest::collection::vec(risk_strategy(), 1..20)) {
            let expected = if levels.contains(&RiskLevel::Red) {
                RiskLevel::Red
            } else if levels.contains(&RiskLevel::Yellow) {
                RiskLevel::Yellow
            } else {
                RiskLevel::Green
            };
            prop_assert_eq!(aggregate_risk(levels), expected);
        }
    }
}
