use sqlx::{
    Executor,
    postgres::PgPool,
};

pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    pool.execute(include_str!("periods.sql")).await?;
    pool.execute(include_str!("projects.sql")).await?;
    pool.execute(include_str!("financial_rows.sql")).await?;
    pool.execute(include_str!("ai_reports.sql")).await?;

    // Report history is read newest first, optionally per period
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_ai_reports_period_created
        ON ai_reports(period_id, created_at DESC);
        "#
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_financial_rows_period
        ON financial_rows(period_id);
        "#
    )
    .execute(pool)
    .await?;

    Ok(())
}
