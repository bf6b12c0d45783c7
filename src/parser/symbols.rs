use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// UI framework a source file targets, detected from import signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    React,
    Vue,
    Svelte,
    Unknown,
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Framework::React => write!(f, "react"),
            Framework::Vue => write!(f, "vue"),
            Framework::Svelte => write!(f, "svelte"),
            Framework::Unknown => write!(f, "unknown"),
        }
    }
}

/// Declaration shape of a component candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentPattern {
    Function,
    Class,
    Hoc,
    ForwardRef,
    Memo,
    Lazy,
}

impl std::fmt::Display for ComponentPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentPattern::Function => write!(f, "function"),
            ComponentPattern::Class => write!(f, "class"),
            ComponentPattern::Hoc => write!(f, "hoc"),
            ComponentPattern::ForwardRef => write!(f, "forward-ref"),
            ComponentPattern::Memo => write!(f, "memo"),
            ComponentPattern::Lazy => write!(f, "lazy"),
        }
    }
}

/// 1-based start/end position of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportInfo {
    pub is_default: bool,
    pub is_named: bool,
}

/// Branching-based complexity metrics for one declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    pub cyclomatic: usize,
    pub cognitive: usize,
    pub lines_of_code: usize,
}

/// A syntax-tree declaration provisionally classified as a UI component.
///
/// Identity is `(file_path, name)`. Created by the syntax analyzer, then
/// enriched in place: props by the prop extractor, variants by the variant
/// detector, usages by the usage tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCandidate {
    pub name: String,
    pub file_path: String,
    pub framework: Framework,
    pub pattern: ComponentPattern,
    pub props: Vec<PropDescriptor>,
    pub variants: Vec<Variant>,
    pub usages: Vec<Usage>,
    pub exports: ExportInfo,
    pub dependencies: Vec<String>,
    pub complexity: ComplexityMetrics,
    pub location: SourceLocation,
}

/// One declared prop. Unique by `name` within a candidate's prop list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub prop_type: String,
    pub required: bool,
    pub default_value: Option<String>,
    pub description: Option<String>,
    pub deprecated: Option<bool>,
    pub deprecation_message: Option<String>,
}

impl PropDescriptor {
    pub fn new(name: impl Into<String>, prop_type: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            prop_type: prop_type.into(),
            required,
            default_value: None,
            description: None,
            deprecated: None,
            deprecation_message: None,
        }
    }
}

/// Which extraction strategy produced a partial prop list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategySource {
    TypeDeclaration,
    PropValidators,
    DefaultValues,
    FrameworkOptions,
    ReactiveBindings,
}

/// Confidence-weighted partial prop list from a single strategy.
///
/// Transient: consumed immediately by the merge step, never persisted.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub props: Vec<PropDescriptor>,
    pub source: StrategySource,
    pub confidence: f32,
}

/// One inferred semantic variant of a component.
///
/// No two variants in a candidate share `(discriminator, discriminator_value)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub discriminator: String,
    pub discriminator_value: String,
    pub additional_props: Vec<String>,
    pub description: Option<String>,
}

impl Variant {
    pub fn new(
        name: impl Into<String>,
        discriminator: impl Into<String>,
        discriminator_value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            discriminator: discriminator.into(),
            discriminator_value: discriminator_value.into(),
            additional_props: Vec::new(),
            description: None,
        }
    }

    /// Dedup key: discriminator plus string-coerced discriminator value.
    pub fn dedup_key(&self) -> String {
        format!("{}:{}", self.discriminator, self.discriminator_value)
    }
}

/// One syntactic reference to a component in a file other than its
/// declaration site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub file_path: String,
    pub line: usize,
    pub column: usize,
    pub props_used: Vec<String>,
    pub import_source: String,
    pub is_default_import: bool,
}

/// A local binding introduced by an import statement. Working state for the
/// usage tracker, scoped to one file; never part of the final report.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBinding {
    pub source: String,
    pub imported_name: String,
    pub local_name: String,
    pub is_default: bool,
    pub is_namespace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisError {
    pub file_path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    Info,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisWarning {
    pub file_path: String,
    pub message: String,
    pub severity: WarningSeverity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_components: usize,
    pub by_framework: HashMap<String, usize>,
    pub by_pattern: HashMap<String, usize>,
    pub total_props: usize,
    pub total_variants: usize,
    pub total_usages: usize,
    pub analysis_time_ms: u64,
}

/// Terminal artifact of one analysis run, handed to the inventory generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub components: Vec<ComponentCandidate>,
    pub summary: AnalysisSummary,
    pub errors: Vec<AnalysisError>,
    pub warnings: Vec<AnalysisWarning>,
}

impl AnalysisReport {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            summary: AnalysisSummary::default(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Recompute the summary counts from the aggregated components.
    pub fn finalize(&mut self, elapsed_ms: u64) {
        let mut by_framework: HashMap<String, usize> = HashMap::new();
        let mut by_pattern: HashMap<String, usize> = HashMap::new();

        for component in &self.components {
            *by_framework
                .entry(component.framework.to_string())
                .or_insert(0) += 1;
            *by_pattern
                .entry(component.pattern.to_string())
                .or_insert(0) += 1;
        }

        self.summary = AnalysisSummary {
            total_components: self.components.len(),
            by_framework,
            by_pattern,
            total_props: self.components.iter().map(|c| c.props.len()).sum(),
            total_variants: self.components.iter().map(|c| c.variants.len()).sum(),
            total_usages: self.components.iter().map(|c| c.usages.len()).sum(),
            analysis_time_ms: elapsed_ms,
        };
    }

    pub fn get_component(&self, file_path: &str, name: &str) -> Option<&ComponentCandidate> {
        self.components
            .iter()
            .find(|c| c.file_path == file_path && c.name == name)
    }
}

impl Default for AnalysisReport {
    fn default() -> Self {
        Self::new()
    }
}
