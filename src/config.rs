use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::parser::symbols::Framework;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub project: ProjectConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub root: PathBuf,
    #[serde(default)]
    pub ts_config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_frameworks")]
    pub frameworks: HashSet<Framework>,
    #[serde(default = "default_true")]
    pub detect_variants: bool,
    #[serde(default = "default_true")]
    pub track_usages: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_frameworks() -> HashSet<Framework> {
    [Framework::React, Framework::Vue, Framework::Svelte]
        .into_iter()
        .collect()
}

fn default_max_file_size() -> u64 {
    1024 * 1024
}

fn default_extensions() -> Vec<String> {
    vec!["js", "jsx", "ts", "tsx", "vue", "svelte"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_exclude_dirs() -> Vec<String> {
    vec!["node_modules", "dist", "build", "coverage", ".next", "out"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frameworks: default_frameworks(),
            detect_variants: true,
            track_usages: true,
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    pub fn from_project_root<P: AsRef<std::path::Path>>(project_root: P) -> Self {
        Self {
            project: ProjectConfig {
                root: project_root.as_ref().to_path_buf(),
                ts_config_path: None,
            },
            analysis: AnalysisConfig::default(),
            discovery: DiscoveryConfig::default(),
        }
    }

    /// Whether files detected as `framework` should be analyzed. Files with
    /// an unknown framework are always processed.
    pub fn framework_enabled(&self, framework: Framework) -> bool {
        framework == Framework::Unknown || self.analysis.frameworks.contains(&framework)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_project_root(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_variants_and_usages() {
        let config = Config::default();
        assert!(config.analysis.detect_variants);
        assert!(config.analysis.track_usages);
        assert_eq!(config.discovery.max_file_size, 1024 * 1024);
    }

    #[test]
    fn unknown_framework_always_enabled() {
        let mut config = Config::default();
        config.analysis.frameworks = [Framework::React].into_iter().collect();

        assert!(config.framework_enabled(Framework::React));
        assert!(config.framework_enabled(Framework::Unknown));
        assert!(!config.framework_enabled(Framework::Vue));
    }

    #[test]
    fn parses_partial_toml() {
        let toml_src = r#"
            [project]
            root = "/tmp/app"

            [analysis]
            detect_variants = false
        "#;
        let config: Config = toml::from_str(toml_src).unwrap();
        assert_eq!(config.project.root, PathBuf::from("/tmp/app"));
        assert!(!config.analysis.detect_variants);
        assert!(config.analysis.track_usages);
        assert!(config.analysis.frameworks.contains(&Framework::Svelte));
    }
}
