pub mod config;
mod analyzer;
mod types;

pub use analyzer::FieldAnalyzer;
pub use config::AnalyzerConfig;
pub use types::FieldAnalysis;
