pub mod periods;
pub mod financial_rows;
pub mod ai_reports;
