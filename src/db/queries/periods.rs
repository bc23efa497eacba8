use sqlx::{PgConnection, PgPool, Error};

use crate::db::models::periods::PeriodModel;

/// Fetch a period by its `YYYY-MM` month
pub async fn get_period_by_month(pool: &PgPool, month: &str) -> Result<Option<PeriodModel>, Error> {
    sqlx::query_as::<_, PeriodModel>("SELECT id, month FROM periods WHERE month = $1")
        .bind(month)
        .fetch_optional(pool)
        .await
}

/// Fetch the latest period before `month` that has at least one financial row
pub async fn get_previous_period_with_rows(pool: &PgPool, month: &str) -> Result<Option<PeriodModel>, Error> {
    sqlx::query_as::<_, PeriodModel>(
        r#"
        SELECT p.id, p.month
        FROM periods p
        WHERE p.month < $1
          AND EXISTS (SELECT 1 FROM financial_rows fr WHERE fr.period_id = p.id)
        ORDER BY p.month DESC
        LIMIT 1
        "#,
    )
    .bind(month)
    .fetch_optional(pool)
    .await
}

/// Most recent well-formed months, newest first
pub async fn list_months(pool: &PgPool, limit: i64) -> Result<Vec<String>, Error> {
    sqlx::query_scalar(
        r#"
        SELECT month
        FROM periods
        WHERE month ~ '^[0-9]{4}-[0-9]{2}$'
        ORDER BY month DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Insert a period if missing and return its ID either way
pub async fn upsert_period(conn: &mut PgConnection, month: &str) -> Result<i32, Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO periods (month)
        VALUES ($1)
        ON CONFLICT (month) DO UPDATE SET month = EXCLUDED.month
        RETURNING id
        "#,
    )
    .bind(month)
    .fetch_one(conn)
    .await
}
