//! Report generation pipeline and the snapshot it persists.

pub mod synthesizer;
pub mod types;

pub use synthesizer::ReportSynthesizer;
pub use types::{GeneratedReport, ReportMetrics, ReportSource};
