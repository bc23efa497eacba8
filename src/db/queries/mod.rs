pub mod periods;
pub mod projects;
pub mod financial_rows;
pub mod ai_reports;
