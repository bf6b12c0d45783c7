use tracing::warn;
use tree_sitter::{Node, Tree};

use crate::context::AnalysisContext;
use crate::parser::ast_utils::*;
use crate::parser::source_parser::SourceParser;
use crate::parser::symbols::{ImportBinding, Usage};

/// Attribute sentinel recorded for JSX spread attributes.
const SPREAD_SENTINEL: &str = "...spread";

/// Resolves cross-file usages of components through import bindings.
///
/// Each file in the context is parsed once up front into its import
/// bindings and JSX element occurrences; per-component lookups then run
/// over that read-only index. A file that fails to parse contributes zero
/// usages (logged, not fatal).
pub struct UsageTracker {
    files: Vec<ScannedFile>,
}

struct ScannedFile {
    path: String,
    bindings: Vec<ImportBinding>,
    elements: Vec<ElementOccurrence>,
}

struct ElementOccurrence {
    tag: String,
    line: usize,
    column: usize,
    props_used: Vec<String>,
}

impl UsageTracker {
    pub fn new(context: &AnalysisContext) -> Self {
        let mut parser = match SourceParser::new() {
            Ok(parser) => parser,
            Err(err) => {
                warn!("Usage tracking disabled, parser init failed: {}", err);
                return Self { files: Vec::new() };
            }
        };

        let mut files = Vec::new();
        for file in context.files() {
            let text = file.script_text();
            let tree = match parser.parse(text, &file.path) {
                Ok(tree) => tree,
                Err(err) => {
                    warn!("Skipping {} for usage tracking: {}", file.path.display(), err);
                    continue;
                }
            };

            files.push(ScannedFile {
                path: file.path.to_string_lossy().into_owned(),
                bindings: extract_import_bindings(&tree, text),
                elements: collect_jsx_occurrences(&tree, text),
            });
        }

        Self { files }
    }

    /// All usage records for one component across the context, excluding
    /// the declaring file itself.
    pub fn usages_for(&self, component_name: &str, declaring_path: &str) -> Vec<Usage> {
        let declaring = normalize_module_path(declaring_path);
        let mut usages = Vec::new();

        for file in &self.files {
            if file.path == declaring_path {
                continue;
            }

            // First matching binding wins per local name, so one element
            // never yields two records.
            let mut matching: Vec<&ImportBinding> = Vec::new();
            for binding in &file.bindings {
                if binding_matches(binding, component_name, &declaring)
                    && !matching.iter().any(|m| m.local_name == binding.local_name)
                {
                    matching.push(binding);
                }
            }

            for binding in matching {
                for element in &file.elements {
                    if element.tag != binding.local_name {
                        continue;
                    }
                    usages.push(Usage {
                        file_path: file.path.clone(),
                        line: element.line,
                        column: element.column,
                        props_used: element.props_used.clone(),
                        import_source: binding.source.clone(),
                        is_default_import: binding.is_default,
                    });
                }
            }
        }

        usages
    }
}

/// Extract default, named (with alias) and namespace import bindings.
pub fn extract_import_bindings(tree: &Tree, source: &str) -> Vec<ImportBinding> {
    let src = source.as_bytes();
    let mut bindings = Vec::new();

    walk_tree(tree.root_node(), &mut |node| {
        if node.kind() != "import_statement" {
            return;
        }
        let Some(source_node) = node.child_by_field_name("source") else {
            return;
        };
        let module = trim_quotes(node_text(source_node, src)).to_string();

        let Some(clause) = find_child_of_kind(node, &["import_clause"]) else {
            return;
        };

        let mut cursor = clause.walk();
        for child in clause.children(&mut cursor) {
            match child.kind() {
                "identifier" => bindings.push(ImportBinding {
                    source: module.clone(),
                    imported_name: "default".to_string(),
                    local_name: node_text(child, src).to_string(),
                    is_default: true,
                    is_namespace: false,
                }),
                "namespace_import" => {
                    if let Some(local) = find_child_of_kind(child, &["identifier"]) {
                        bindings.push(ImportBinding {
                            source: module.clone(),
                            imported_name: "*".to_string(),
                            local_name: node_text(local, src).to_string(),
                            is_default: false,
                            is_namespace: true,
                        });
                    }
                }
                "named_imports" => {
                    let mut spec_cursor = child.walk();
                    for spec in child.children(&mut spec_cursor) {
                        if spec.kind() != "import_specifier" {
                            continue;
                        }
                        let Some(name) = spec.child_by_field_name("name") else {
                            continue;
                        };
                        let imported = node_text(name, src).to_string();
                        let local = spec
                            .child_by_field_name("alias")
                            .map(|a| node_text(a, src).to_string())
                            .unwrap_or_else(|| imported.clone());
                        bindings.push(ImportBinding {
                            source: module.clone(),
                            imported_name: imported,
                            local_name: local,
                            is_default: false,
                            is_namespace: false,
                        });
                    }
                }
                _ => {}
            }
        }
    });

    bindings
}

/// A binding matches a component iff the imported name equals the component
/// name (or the binding is a default import) and its module source resolves
/// to the declaring module: exact normalized match, or the import source
/// contained in the normalized declaring path (partial/relative resolution
/// without a full module resolver).
pub fn binding_matches(
    binding: &ImportBinding,
    component_name: &str,
    normalized_declaring: &str,
) -> bool {
    let name_matches = binding.imported_name == component_name || binding.is_default;
    if !name_matches {
        return false;
    }

    let source = normalize_module_path(&binding.source);
    !source.is_empty()
        && (source == normalized_declaring || normalized_declaring.contains(&source))
}

/// Normalize a module path for comparison: forward slashes, no relative
/// prefixes, no extension, no trailing `index` segment.
pub fn normalize_module_path(path: &str) -> String {
    let mut normalized = path.replace('\\', "/");

    while let Some(rest) = normalized
        .strip_prefix("./")
        .or_else(|| normalized.strip_prefix("../"))
    {
        normalized = rest.to_string();
    }

    if let Some(dot) = normalized.rfind('.') {
        let ext = &normalized[dot + 1..];
        if matches!(ext, "js" | "jsx" | "ts" | "tsx" | "vue" | "svelte") {
            normalized.truncate(dot);
        }
    }

    if let Some(stripped) = normalized.strip_suffix("/index") {
        normalized = stripped.to_string();
    }

    normalized
}

fn collect_jsx_occurrences(tree: &Tree, source: &str) -> Vec<ElementOccurrence> {
    let src = source.as_bytes();
    let mut elements = Vec::new();

    walk_tree(tree.root_node(), &mut |node| {
        let attribute_holder = match node.kind() {
            "jsx_self_closing_element" => Some(node),
            "jsx_element" => node.child(0).filter(|n| n.kind() == "jsx_opening_element"),
            _ => None,
        };
        let (Some(holder), Some(tag)) = (attribute_holder, jsx_tag_name(node, src)) else {
            return;
        };

        elements.push(ElementOccurrence {
            tag: tag.to_string(),
            line: node.start_position().row + 1,
            column: node.start_position().column + 1,
            props_used: attribute_names(holder, src),
        });
    });

    elements
}

fn attribute_names(element: Node, source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = element.walk();
    for child in element.children(&mut cursor) {
        match child.kind() {
            "jsx_attribute" => {
                if let Some(name) = child.child(0) {
                    names.push(node_text(name, source).to_string());
                }
            }
            // {...props} in attribute position
            "jsx_expression" => names.push(SPREAD_SENTINEL.to_string()),
            _ => {}
        }
    }
    names
}
