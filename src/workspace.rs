use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::Config;

/// Finds analyzable source files under the configured project root.
///
/// Produces an ordered (path-sorted) list of absolute paths, filtered by
/// extension, excluded directories and the configured maximum file size.
#[derive(Debug)]
pub struct ProjectDiscovery {
    config: Config,
}

impl ProjectDiscovery {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn discover_files(&self) -> Result<Vec<PathBuf>> {
        let root = &self.config.project.root;
        if !root.exists() {
            bail!("Project root does not exist: {}", root.display());
        }
        let root = root
            .canonicalize()
            .with_context(|| format!("Failed to access project root: {}", root.display()))?;

        let mut files = Vec::new();
        let walker = WalkDir::new(&root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.has_matching_extension(entry.path()) {
                continue;
            }

            match entry.metadata() {
                Ok(meta) if meta.len() <= self.config.discovery.max_file_size => {
                    files.push(entry.path().to_path_buf());
                }
                Ok(meta) => {
                    debug!(
                        "Skipping oversized file ({} bytes): {}",
                        meta.len(),
                        entry.path().display()
                    );
                }
                Err(err) => {
                    debug!("Skipping file without metadata: {}", err);
                }
            }
        }

        files.sort();
        Ok(files)
    }

    fn is_excluded(&self, entry: &walkdir::DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let Some(name) = entry.file_name().to_str() else {
            return false;
        };

        name.starts_with('.') || self.config.discovery.exclude_dirs.iter().any(|d| d == name)
    }

    fn has_matching_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.config.discovery.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn discovers_sorted_source_files() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "src/Button.tsx", "export const Button = () => null;");
        write(tmp.path(), "src/App.jsx", "export default function App() {}");
        write(tmp.path(), "src/util.rs", "fn main() {}");

        let discovery = ProjectDiscovery::new(Config::from_project_root(tmp.path()));
        let files = discovery.discover_files().unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("src/App.jsx"));
        assert!(files[1].ends_with("src/Button.tsx"));
    }

    #[test]
    fn skips_node_modules_and_oversized_files() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "node_modules/react/index.js", "module.exports = {};");
        write(tmp.path(), "src/big.tsx", &"x".repeat(64));
        write(tmp.path(), "src/ok.tsx", "export {}");

        let mut config = Config::from_project_root(tmp.path());
        config.discovery.max_file_size = 32;
        let discovery = ProjectDiscovery::new(config);
        let files = discovery.discover_files().unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/ok.tsx"));
    }

    #[test]
    fn missing_root_is_an_error() {
        let discovery =
            ProjectDiscovery::new(Config::from_project_root("/definitely/not/a/real/path"));
        assert!(discovery.discover_files().is_err());
    }
}
