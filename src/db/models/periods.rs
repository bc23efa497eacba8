use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct PeriodModel {
    pub id: i32,
    pub month: String,
}
