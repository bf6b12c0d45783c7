pub mod analyzer;
pub mod config;
pub mod context;
pub mod detector;
pub mod extractor;
pub mod parser;
pub mod usages;
pub mod variants;
pub mod workspace;

pub use analyzer::ProjectAnalyzer;
pub use config::Config;
pub use context::{AnalysisContext, SourceFile};
pub use detector::detect_framework;
pub use parser::{
    AnalysisReport, ComponentAnalyzer, ComponentCandidate, ComponentPattern, Framework,
    PropDescriptor, SourceParser, Usage, Variant,
};
pub use usages::UsageTracker;
pub use workspace::ProjectDiscovery;
