use sqlx::{PgConnection, PgPool, Error};

use crate::db::models::financial_rows::{FinancialRowModel, NewFinancialRowModel};

/// Fetch every project's row for a period, ordered by project name
pub async fn get_rows_for_period(pool: &PgPool, period_id: i32) -> Result<Vec<FinancialRowModel>, Error> {
    sqlx::query_as::<_, FinancialRowModel>(
        r#"
        SELECT
            pr.name AS project,
            fr.revenue_no_vat,
            fr.salary_workers,
            fr.salary_manager,
            fr.salary_head,
            fr.ads,
            fr.transport,
            fr.penalties,
            fr.tax
        FROM financial_rows fr
        JOIN projects pr ON pr.id = fr.project_id
        WHERE fr.period_id = $1
        ORDER BY pr.name
        "#,
    )
    .bind(period_id)
    .fetch_all(pool)
    .await
}

/// Insert a row, or replace every figure of the existing (project, period) row
pub async fn upsert_financial_row(conn: &mut PgConnection, row: &NewFinancialRowModel) -> Result<(), Error> {
    sqlx::query(
        r#"
        INSERT INTO financial_rows (
            project_id, period_id, revenue_no_vat,
            salary_workers, salary_manager, salary_head,
            ads, transport, penalties, tax
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (project_id, period_id) DO UPDATE SET
            revenue_no_vat = EXCLUDED.revenue_no_vat,
            salary_workers = EXCLUDED.salary_workers,
            salary_manager = EXCLUDED.salary_manager,
            salary_head = EXCLUDED.salary_head,
            ads = EXCLUDED.ads,
            transport = EXCLUDED.transport,
            penalties = EXCLUDED.penalties,
            tax = EXCLUDED.tax,
            updated_at = now()
        "#,
    )
    .bind(row.project_id)
    .bind(row.period_id)
    .bind(row.revenue_no_vat)
    .bind(row.salary_workers)
    .bind(row.salary_manager)
    .bind(row.salary_head)
    .bind(row.ads)
    .bind(row.transport)
    .bind(row.penalties)
    .bind(row.tax)
    .execute(conn)
    .await?;

    Ok(())
}
