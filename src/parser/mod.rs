pub mod ast_utils;
pub mod component_analyzer;
pub mod source_parser;
pub mod symbols;

pub use component_analyzer::ComponentAnalyzer;
pub use source_parser::SourceParser;
pub use symbols::{
    AnalysisReport, ComponentCandidate, ComponentPattern, Framework, PropDescriptor, Usage,
    Variant,
};
