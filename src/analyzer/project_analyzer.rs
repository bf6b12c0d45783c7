use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::Config;
use crate::context::{AnalysisContext, SourceFile};
use crate::extractor::extract_props;
use crate::parser::component_analyzer::{ComponentAnalyzer, complexity_of};
use crate::parser::ast_utils::location_of;
use crate::parser::source_parser::SourceParser;
use crate::parser::symbols::*;
use crate::usages::UsageTracker;
use crate::variants::{detect_variants, detect_variants_from_source, merge_variants};
use crate::workspace::ProjectDiscovery;

/// Drives the full analysis pipeline and aggregates the project report.
///
/// Per-file failures are captured as report errors and never abort the
/// run; the only fatal condition is an inaccessible project root.
pub struct ProjectAnalyzer {
    config: Config,
    parser: SourceParser,
}

impl ProjectAnalyzer {
    pub fn new<P: AsRef<Path>>(project_root: P) -> Result<Self> {
        Self::with_config(Config::from_project_root(project_root))
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let parser = SourceParser::new()?;
        Ok(Self { config, parser })
    }

    /// Discover files under the configured root and analyze them.
    pub fn analyze(&mut self) -> Result<AnalysisReport> {
        let discovery = ProjectDiscovery::new(self.config.clone());
        let files = discovery
            .discover_files()
            .context("Project discovery failed")?;
        info!("Discovered {} candidate files", files.len());
        self.analyze_paths(&files)
    }

    /// Analyze an externally supplied, ordered file list.
    pub fn analyze_paths(&mut self, paths: &[PathBuf]) -> Result<AnalysisReport> {
        let started = Instant::now();
        let mut report = AnalysisReport::new();

        // The context must hold the complete file set before any per-file
        // work: usage tracking and type lookups are cross-file.
        let mut sources = Vec::new();
        for path in paths {
            match std::fs::read_to_string(path) {
                Ok(source) => sources.push(SourceFile::new(path.clone(), source)),
                Err(err) => report.errors.push(AnalysisError {
                    file_path: path.to_string_lossy().into_owned(),
                    message: format!("Failed to read file: {}", err),
                    stack: None,
                }),
            }
        }
        let context = AnalysisContext::new(sources);

        self.analyze_context(&context, &mut report);
        report.finalize(started.elapsed().as_millis() as u64);

        info!(
            "Analyzed {} components across {} files in {}ms",
            report.summary.total_components,
            context.files().len(),
            report.summary.analysis_time_ms
        );
        Ok(report)
    }

    fn analyze_context(&mut self, context: &AnalysisContext, report: &mut AnalysisReport) {
        for file in context.files() {
            if !self.config.framework_enabled(file.framework) {
                report.warnings.push(AnalysisWarning {
                    file_path: file.path.to_string_lossy().into_owned(),
                    message: format!("Skipped: framework '{}' not enabled", file.framework),
                    severity: WarningSeverity::Info,
                });
                continue;
            }

            match self.analyze_file(file) {
                Ok(candidates) => {
                    debug!(
                        "{}: {} candidate(s)",
                        file.path.display(),
                        candidates.len()
                    );
                    report.components.extend(candidates);
                }
                Err(err) => report.errors.push(AnalysisError {
                    file_path: file.path.to_string_lossy().into_owned(),
                    message: err.to_string(),
                    stack: None,
                }),
            }
        }

        if self.config.analysis.track_usages {
            let tracker = UsageTracker::new(context);
            for component in &mut report.components {
                component.usages = tracker.usages_for(&component.name, &component.file_path);
            }
        }
    }

    fn analyze_file(&mut self, file: &SourceFile) -> Result<Vec<ComponentCandidate>> {
        let text = file.script_text();
        let tree = self.parser.parse(text, &file.path)?;

        let mut candidates =
            ComponentAnalyzer::new(text, &file.path, file.framework).extract_components(&tree);

        // A single-file component is itself the component; when its script
        // declares none, the file stem names the candidate.
        if candidates.is_empty() {
            if let Some(candidate) = self.sfc_candidate(file, &tree, text) {
                candidates.push(candidate);
            }
        }

        for candidate in &mut candidates {
            candidate.props = extract_props(&tree, text, file.framework, &candidate.name);

            if self.config.analysis.detect_variants {
                let mut variants = detect_variants(&candidate.props);
                variants.extend(detect_variants_from_source(
                    &tree,
                    text,
                    &format!("{}Props", candidate.name),
                ));
                candidate.variants = merge_variants(variants);
            }
        }

        Ok(candidates)
    }

    fn sfc_candidate(
        &self,
        file: &SourceFile,
        tree: &tree_sitter::Tree,
        text: &str,
    ) -> Option<ComponentCandidate> {
        if !matches!(file.framework, Framework::Vue | Framework::Svelte) {
            return None;
        }
        if !matches!(
            file.path.extension().and_then(|e| e.to_str()),
            Some("vue") | Some("svelte")
        ) {
            return None;
        }
        let name = file.path.file_stem()?.to_str()?;
        if !name.starts_with(|c: char| c.is_ascii_uppercase()) {
            return None;
        }

        let root = tree.root_node();
        Some(ComponentCandidate {
            name: name.to_string(),
            file_path: file.path.to_string_lossy().into_owned(),
            framework: file.framework,
            pattern: ComponentPattern::Function,
            props: Vec::new(),
            variants: Vec::new(),
            usages: Vec::new(),
            exports: ExportInfo {
                is_default: true,
                is_named: false,
            },
            dependencies: Vec::new(),
            complexity: complexity_of(root, text.as_bytes()),
            location: location_of(root),
        })
    }
}
