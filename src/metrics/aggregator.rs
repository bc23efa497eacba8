use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::dec;

use super::risk::project_risk;
use super::types::{FinancialRow, PeriodMetrics, PeriodTotals, ProjectMetrics, TrendDeltas};

const MONEY_DP: u32 = 2;
const MARGIN_DP: u32 = 4;

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round_margin(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MARGIN_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// `profit / revenue`, or zero when there is no revenue to divide by.
pub fn margin(profit: Decimal, revenue: Decimal) -> Decimal {
    if revenue > Decimal::ZERO {
        profit.checked_div(revenue).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    }
}

pub fn compute_project(row: &FinancialRow) -> ProjectMetrics {
    let costs = row.costs();
    let profit = row.revenue - costs;
    // Tier on the margin that is shown, so the two never disagree
    let shown_margin = round_margin(margin(profit, row.revenue));

    ProjectMetrics {
        project: row.project.clone(),
        revenue: round_money(row.revenue),
        costs: round_money(costs),
        profit: round_money(profit),
        margin: shown_margin,
        risk: project_risk(row.revenue, shown_margin, row.penalties),
        penalties: round_money(row.penalties),
        ads: round_money(row.ads),
        labor: round_money(row.salary_workers),
    }
}

/// Sums across projects and recomputes margin from the sums, so large
/// projects weigh in proportion to their revenue.
pub fn compute_totals(projects: &[ProjectMetrics]) -> PeriodTotals {
    let revenue: Decimal = projects.iter().map(|p| p.revenue).sum();
    let costs: Decimal = projects.iter().map(|p| p.costs).sum();
    let profit: Decimal = projects.iter().map(|p| p.profit).sum();

    PeriodTotals {
        revenue: round_money(revenue),
        costs: round_money(costs),
        profit: round_money(profit),
        margin: round_margin(margin(profit, revenue)),
    }
}

pub fn compute_period(rows: &[FinancialRow]) -> PeriodMetrics {
    let mut projects: Vec<ProjectMetrics> = rows.iter().map(compute_project).collect();
    projects.sort_by(|a, b| a.project.cmp(&b.project));
    let totals = compute_totals(&projects);

    PeriodMetrics { projects, totals }
}

/// The `n` lowest-margin projects, worst first. Ties break by name.
pub fn worst_projects(projects: &[ProjectMetrics], n: usize) -> Vec<ProjectMetrics> {
    let mut ranked: Vec<ProjectMetrics> = projects.to_vec();
    ranked.sort_by(|a, b| a.margin.cmp(&b.margin).then_with(|| a.project.cmp(&b.project)));
    ranked.truncate(n);
    ranked
}

pub fn trend_deltas(current: &PeriodTotals, previous: &PeriodTotals) -> TrendDeltas {
    TrendDeltas {
        profit_delta: round_money(current.profit - previous.profit),
        margin_delta_pp: round_money((current.margin - previous.margin) * dec!(100)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::metrics::types::RiskLevel;

    fn row(project: &str, revenue: Decimal, workers: Decimal, penalties: Decimal) -> FinancialRow {
        FinancialRow {
            project: project.to_string(),
            revenue,
            salary_workers: workers,
            penalties,
            ..Default::default()
        }
    }

    #[test]
    fn costs_sum_every_component() {
        let r = FinancialRow {
            project: "Alpha".into(),
            revenue: dec!(100000),
            salary_workers: dec!(50000),
            salary_manager: dec!(10000),
            salary_head: dec!(5000),
            ads: dec!(10000),
            transport: dec!(5000),
            penalties: dec!(0),
            tax: dec!(15000),
        };
        let m = compute_project(&r);
        assert_eq!(m.costs, dec!(95000));
        assert_eq!(m.profit, dec!(5000));
        assert_eq!(m.margin, dec!(0.05));
        assert_eq!(m.risk, RiskLevel::Red);
    }

    #[test]
    fn healthy_project_with_penalties_is_yellow() {
        let m = compute_project(&row("Beta", dec!(100000), dec!(69500), dec!(500)));
        assert_eq!(m.margin, dec!(0.30));
        assert_eq!(m.risk, RiskLevel::Yellow);
    }

    #[test]
    fn zero_revenue_margin_is_zero() {
        let m = compute_project(&row("Idle", Decimal::ZERO, dec!(200), Decimal::ZERO));
        assert_eq!(m.margin, Decimal::ZERO);
        assert_eq!(m.profit, dec!(-200));
        assert_eq!(m.risk, RiskLevel::Green);
    }

    #[test]
    fn totals_margin_is_recomputed_not_averaged() {
        let period = compute_period(&[
            row("Big", dec!(900), dec!(450), Decimal::ZERO),  // margin 0.5
            row("Small", dec!(100), dec!(100), Decimal::ZERO), // margin 0
        ]);
        assert_eq!(period.totals.revenue, dec!(1000));
        assert_eq!(period.totals.profit, dec!(450));
        assert_eq!(period.totals.margin, dec!(0.45));
    }

    #[test]
    fn margin_rounds_to_basis_points() {
        let m = compute_project(&row("Third", dec!(3), dec!(2), Decimal::ZERO));
        assert_eq!(m.margin, dec!(0.3333));
    }

    #[test]
    fn risk_uses_the_rounded_margin() {
        // Raw margin 0.099996 is shown as 0.1000 and tiers yellow, not red
        let m = compute_project(&row("Edge", dec!(1000000), dec!(900004), Decimal::ZERO));
        assert_eq!(m.margin, dec!(0.1000));
        assert_eq!(m.risk, RiskLevel::Yellow);
    }

    #[test]
    fn projects_are_sorted_by_name() {
        let period = compute_period(&[
            row("Zeta", dec!(10), Decimal::ZERO, Decimal::ZERO),
            row("Alpha", dec!(10), Decimal::ZERO, Decimal::ZERO),
        ]);
        let names: Vec<&str> = period.projects.iter().map(|p| p.project.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn worst_projects_ranks_by_margin() {
        let period = compute_period(&[
            row("A", dec!(100), dec!(10), Decimal::ZERO),
            row("B", dec!(100), dec!(95), Decimal::ZERO),
            row("C", dec!(100), dec!(50), Decimal::ZERO),
        ]);
        let worst = worst_projects(&period.projects, 2);
        let names: Vec<&str> = worst.iter().map(|p| p.project.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn deltas_are_in_percentage_points() {
        let current = PeriodTotals { revenue: dec!(1000), costs: dec!(800), profit: dec!(200), margin: dec!(0.2) };
        let previous = PeriodTotals { revenue: dec!(1000), costs: dec!(850), profit: dec!(150), margin: dec!(0.15) };
        let deltas = trend_deltas(&current, &previous);
        assert_eq!(deltas.profit_delta, dec!(50));
        assert_eq!(deltas.margin_delta_pp, dec!(5));
    }

    #[test]
    fn empty_period_has_zero_totals() {
        let period = compute_period(&[]);
        assert!(period.projects.is_empty());
        assert_eq!(period.totals, PeriodTotals::default());
    }

    fn row_strategy() -> impl Strategy<Value = FinancialRow> {
        ("[A-Z][a-z]{2,8}", 0i64..10_000_000, 0i64..5_000_000, 0i64..1_000_000, 0i64..50_000).prop_map(
            |(project, revenue, workers, tax, penalties)| FinancialRow {
                project,
                revenue: Decimal::new(revenue, 2),
                salary_workers: Decimal::new(workers, 2),
                tax: Decimal::new(tax, 2),
                penalties: Decimal::new(penalties, 2),
                ..Default::default()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_totals_ignore_row_order(rows in proptest::collection::vec(row_strategy(), 0..12)) {
            let forward = compute_period(&rows).totals;
            let mut reversed_rows = rows.clone();
            reversed_rows.reverse();
            let reversed = compute_period(&reversed_rows).totals;
            prop_assert_eq!(forward, reversed);
        }

        #[test]
        fn prop_profit_is_revenue_minus_costs(r in row_strategy()) {
            let m = compute_project(&r);
            prop_assert_eq!(m.profit, m.revenue - m.costs);
            if r.revenue > Decimal::ZERO {
                prop_assert_eq!(m.margin, round_margin((r.revenue - r.costs()) / r.revenue));
            } else {
                prop_assert_eq!(m.margin, Decimal::ZERO);
            }
        }
    }
}
