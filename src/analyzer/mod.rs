pub mod project_analyzer;

pub use project_analyzer::ProjectAnalyzer;
