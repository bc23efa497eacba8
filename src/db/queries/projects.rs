use sqlx::{PgConnection, Error};

/// Insert a project if missing and return its ID either way
pub async fn upsert_project(conn: &mut PgConnection, name: &str) -> Result<i32, Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO projects (name)
        VALUES ($1)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(name)
    .fetch_one(conn)
    .await
}
