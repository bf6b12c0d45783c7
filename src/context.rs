use std::path::PathBuf;

use crate::detector::detect_framework;
use crate::parser::symbols::Framework;

/// One loaded source file with its detected framework.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub source: String,
    pub framework: Framework,
}

impl SourceFile {
    pub fn new(path: PathBuf, source: String) -> Self {
        let framework = detect_framework(&source, &path);
        Self {
            path,
            source,
            framework,
        }
    }

    /// The text the analysis engine operates on. For single-file components
    /// that is the first `<script>` block; for plain JS/TS files, the whole
    /// file.
    pub fn script_text(&self) -> &str {
        match self.path.extension().and_then(|e| e.to_str()) {
            Some("vue") | Some("svelte") => extract_script_block(&self.source),
            _ => &self.source,
        }
    }
}

/// Immutable snapshot of the full file set for one project pass.
///
/// Built once, before any per-file analysis, because cross-file lookups
/// (usage tracking, type-name resolution) depend on having all files loaded.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    files: Vec<SourceFile>,
}

impl AnalysisContext {
    pub fn new(files: Vec<SourceFile>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }
}

/// Slice the first `<script ...>...</script>` block out of an SFC. Falls
/// back to the whole source when no block is present (svelte modules are
/// script from the first byte once markup is ignored by the grammar).
fn extract_script_block(source: &str) -> &str {
    let Some(open_start) = source.find("<script") else {
        return source;
    };
    let Some(open_end) = source[open_start..].find('>') else {
        return source;
    };
    let body_start = open_start + open_end + 1;
    let Some(close) = source[body_start..].find("</script>") else {
        return source;
    };
    &source[body_start..body_start + close]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_sfc_script_block() {
        let sfc = "<template><div/></template>\n<script lang=\"ts\">\nexport let label;\n</script>\n";
        let file = SourceFile::new(PathBuf::from("Button.svelte"), sfc.to_string());
        assert_eq!(file.script_text().trim(), "export let label;");
        assert_eq!(file.framework, Framework::Svelte);
    }

    #[test]
    fn plain_files_pass_through() {
        let file = SourceFile::new(
            PathBuf::from("Button.tsx"),
            "import React from 'react';".to_string(),
        );
        assert_eq!(file.script_text(), file.source);
        assert_eq!(file.framework, Framework::React);
    }
}
