use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::metrics::FinancialRow;
use crate::store::ImportRow;

/// A `financial_rows` record joined with its project name. Figure columns
/// are nullable; `From` coerces NULL to zero.
#[derive(Debug, FromRow)]
pub struct FinancialRowModel {
    pub project: String,
    pub revenue_no_vat: Option<Decimal>,
    pub salary_workers: Option<Decimal>,
    pub salary_manager: Option<Decimal>,
    pub salary_head: Option<Decimal>,
    pub ads: Option<Decimal>,
    pub transport: Option<Decimal>,
    pub penalties: Option<Decimal>,
    pub tax: Option<Decimal>,
}

impl From<FinancialRowModel> for FinancialRow {
    fn from(model: FinancialRowModel) -> Self {
        Self {
            project: model.project,
            revenue: model.revenue_no_vat.unwrap_or_default(),
            salary_workers: model.salary_workers.unwrap_or_default(),
            salary_manager: model.salary_manager.unwrap_or_default(),
            salary_head: model.salary_head.unwrap_or_default(),
            ads: model.ads.unwrap_or_default(),
            transport: model.transport.unwrap_or_default(),
            penalties: model.penalties.unwrap_or_default(),
            tax: model.tax.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewFinancialRowModel {
    pub project_id: i32,
    pub period_id: i32,
    pub revenue_no_vat: Decimal,
    pub salary_workers: Decimal,
    pub salary_manager: Decimal,
    pub salary_head: Decimal,
    pub ads: Decimal,
    pub transport: Decimal,
    pub penalties: Decimal,
    pub tax: Decimal,
}

impl NewFinancialRowModel {
    pub fn from(row: &ImportRow, project_id: i32, period_id: i32) -> Self {
        Self {
            project_id,
            period_id,
            revenue_no_vat: row.revenue,
            salary_workers: row.salary_workers,
            salary_manager: row.salary_manager,
            salary_head: row.salary_head,
            ads: row.ads,
            transport: row.transport,
            penalties: row.penalties,
            tax: row.tax,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn null_columns_become_zero() {
        let model = FinancialRowModel {
            project: "Alpha".to_string(),
            revenue_no_vat: Some(dec!(1000)),
            salary_workers: None,
            salary_manager: None,
            salary_head: None,
            ads: Some(dec!(50)),
            transport: None,
            penalties: None,
            tax: None,
        };
        let row = FinancialRow::from(model);
        assert_eq!(row.revenue, dec!(1000));
        assert_eq!(row.salary_workers, Decimal::ZERO);
        assert_eq!(row.costs(), dec!(50));
    }
}
