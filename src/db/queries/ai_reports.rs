use sqlx::{PgPool, Error};

use crate::db::models::ai_reports::{AiReportModel, NewAiReportModel};

const REPORT_COLUMNS: &str = r#"
    ar.id,
    p.month,
    ar.risk_level,
    ar.summary_text,
    ar.issues,
    ar.metrics,
    ar.created_at
"#;

/// Insert a report in one statement and return its ID
pub async fn insert_ai_report(pool: &PgPool, report: &NewAiReportModel) -> Result<i64, Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO ai_reports (period_id, risk_level, summary_text, issues, metrics)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(report.period_id)
    .bind(&report.risk_level)
    .bind(&report.summary_text)
    .bind(&report.issues)
    .bind(&report.metrics)
    .fetch_one(pool)
    .await
}

/// Most recent reports first, optionally for a single month
pub async fn list_ai_reports(pool: &PgPool, month: Option<&str>, limit: i64) -> Result<Vec<AiReportModel>, Error> {
    let sql = format!(
        r#"
        SELECT {REPORT_COLUMNS}
        FROM ai_reports ar
        JOIN periods p ON p.id = ar.period_id
        WHERE ($1::text IS NULL OR p.month = $1)
        ORDER BY ar.created_at DESC, ar.id DESC
        LIMIT $2
        "#
    );
    sqlx::query_as::<_, AiReportModel>(&sql)
        .bind(month)
        .bind(limit)
        .fetch_all(pool)
        .await
}

/// Fetch a single report by ID
pub async fn get_ai_report(pool: &PgPool, id: i64) -> Result<Option<AiReportModel>, Error> {
    let sql = format!(
        r#"
        SELECT {REPORT_COLUMNS}
        FROM ai_reports ar
        JOIN periods p ON p.id = ar.period_id
        WHERE ar.id = $1
        "#
    );
    sqlx::query_as::<_, AiReportModel>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}
