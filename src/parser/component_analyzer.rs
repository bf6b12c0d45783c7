use indexmap::IndexMap;
use std::path::Path;
use tree_sitter::{Node, Tree};

use crate::parser::ast_utils::*;
use crate::parser::symbols::*;

/// Base types whose subclasses count as class components.
const CLASS_COMPONENT_BASES: &[&str] = &[
    "Component",
    "PureComponent",
    "React.Component",
    "React.PureComponent",
];

/// Walks a file's syntax tree and classifies component declarations.
///
/// Candidates are keyed by name in an insertion-ordered map; a later
/// declaration with the same name overwrites an earlier one.
pub struct ComponentAnalyzer<'a> {
    source: &'a [u8],
    file_path: String,
    framework: Framework,
    candidates: IndexMap<String, ComponentCandidate>,
}

impl<'a> ComponentAnalyzer<'a> {
    pub fn new(source: &'a str, file_path: &Path, framework: Framework) -> Self {
        Self {
            source: source.as_bytes(),
            file_path: file_path.to_string_lossy().into_owned(),
            framework,
            candidates: IndexMap::new(),
        }
    }

    pub fn extract_components(mut self, tree: &'a Tree) -> Vec<ComponentCandidate> {
        self.visit(tree.root_node(), ExportInfo::default());
        self.candidates.into_values().collect()
    }

    fn visit(&mut self, node: Node<'a>, exports: ExportInfo) {
        match node.kind() {
            "export_statement" => {
                let is_default = node_text(node, self.source).starts_with("export default");
                let child_exports = ExportInfo {
                    is_default,
                    is_named: !is_default,
                };

                // `export default Name;` promotes an already-seen candidate.
                if is_default {
                    if let Some(ident) = find_child_of_kind(node, &["identifier"]) {
                        let name = node_text(ident, self.source).to_string();
                        if let Some(candidate) = self.candidates.get_mut(&name) {
                            candidate.exports.is_default = true;
                        }
                    }
                }

                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    self.visit(child, child_exports);
                }
            }
            "function_declaration" => {
                self.classify_function(node, exports);
                self.descend(node);
            }
            "class_declaration" => {
                self.classify_class(node, exports);
                self.descend(node);
            }
            "lexical_declaration" | "variable_declaration" => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if child.kind() == "variable_declarator" {
                        self.classify_declarator(child, exports);
                    }
                }
                self.descend(node);
            }
            _ => self.descend(node),
        }
    }

    fn descend(&mut self, node: Node<'a>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child, ExportInfo::default());
        }
    }

    fn classify_function(&mut self, node: Node<'a>, exports: ExportInfo) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = node_text(name_node, self.source).to_string();
        if !starts_uppercase(&name) {
            return;
        }

        let body = node.child_by_field_name("body");
        let pattern = if let Some(wrapper) = wrapper_pattern(node_text(node, self.source)) {
            wrapper
        } else if is_hoc_name(&name) {
            ComponentPattern::Hoc
        } else if self.jsx_requirement_met(body, ComponentPattern::Function) {
            ComponentPattern::Function
        } else {
            return;
        };

        self.register(name, pattern, node, body, exports);
    }

    fn classify_class(&mut self, node: Node<'a>, exports: ExportInfo) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = node_text(name_node, self.source).to_string();
        if !starts_uppercase(&name) {
            return;
        }

        let Some(base) = self.heritage_base(node) else {
            return;
        };
        if !CLASS_COMPONENT_BASES.contains(&base.as_str()) {
            return;
        }

        let pattern =
            wrapper_pattern(node_text(node, self.source)).unwrap_or(ComponentPattern::Class);
        let body = node.child_by_field_name("body");
        self.register(name, pattern, node, body, exports);
    }

    fn classify_declarator(&mut self, declarator: Node<'a>, exports: ExportInfo) {
        let Some(name_node) = declarator.child_by_field_name("name") else {
            return;
        };
        if name_node.kind() != "identifier" {
            return;
        }
        let name = node_text(name_node, self.source).to_string();
        if !starts_uppercase(&name) {
            return;
        }

        let Some(value) = declarator.child_by_field_name("value") else {
            return;
        };

        match value.kind() {
            "arrow_function" | "function_expression" | "function" => {
                let body = value.child_by_field_name("body");
                let pattern = if let Some(wrapper) = wrapper_pattern(node_text(value, self.source))
                {
                    wrapper
                } else if is_hoc_name(&name) {
                    ComponentPattern::Hoc
                } else if self.jsx_requirement_met(body, ComponentPattern::Function) {
                    ComponentPattern::Function
                } else {
                    return;
                };
                self.register(name, pattern, declarator, body, exports);
            }
            // forwardRef/memo/lazy wrapper calls bind the component indirectly.
            "call_expression" => {
                let Some(pattern) = wrapper_pattern(node_text(value, self.source)) else {
                    return;
                };
                if !self.jsx_requirement_met(Some(value), pattern) {
                    return;
                }
                self.register(name, pattern, declarator, Some(value), exports);
            }
            _ => {}
        }
    }

    /// React function components must (recursively) contain JSX. Other
    /// frameworks classify on name alone, and `lazy` wrappers never
    /// contain markup.
    fn jsx_requirement_met(&self, body: Option<Node>, pattern: ComponentPattern) -> bool {
        if self.framework != Framework::React || pattern == ComponentPattern::Lazy {
            return true;
        }
        body.map(contains_jsx).unwrap_or(false)
    }

    fn heritage_base(&self, class_node: Node) -> Option<String> {
        let heritage = find_child_of_kind(class_node, &["class_heritage"])?;
        let expr = find_child_of_kind(heritage, &["extends_clause"])
            .and_then(|ext| {
                let mut cursor = ext.walk();
                ext.children(&mut cursor)
                    .find(|c| matches!(c.kind(), "identifier" | "member_expression"))
            })
            .or_else(|| {
                // The javascript grammar puts the expression directly under
                // class_heritage.
                let mut cursor = heritage.walk();
                heritage
                    .children(&mut cursor)
                    .find(|c| matches!(c.kind(), "identifier" | "member_expression"))
            })?;

        let text = node_text(expr, self.source);
        // Strip generic arguments: React.Component<Props, State>
        Some(text.split('<').next().unwrap_or(text).trim().to_string())
    }

    fn register(
        &mut self,
        name: String,
        pattern: ComponentPattern,
        node: Node,
        body: Option<Node>,
        exports: ExportInfo,
    ) {
        let mut dependencies = Vec::new();
        if let Some(body) = body {
            collect_component_tags(body, self.source, &mut dependencies);
        }

        let candidate = ComponentCandidate {
            name: name.clone(),
            file_path: self.file_path.clone(),
            framework: self.framework,
            pattern,
            props: Vec::new(),
            variants: Vec::new(),
            usages: Vec::new(),
            exports,
            dependencies,
            complexity: complexity_of(node, self.source),
            location: location_of(node),
        };

        // Last write wins on duplicate names within one file.
        self.candidates.insert(name, candidate);
    }
}

fn starts_uppercase(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
}

fn is_hoc_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.starts_with("with") || lower.starts_with("enhance") || lower.starts_with("wrap")
}

/// Substring detection of `forwardRef`/`memo`/`lazy` wrapper calls. Takes
/// precedence over the function/class pattern tag. Word-boundary guarded so
/// `useMemo(` does not read as a `memo(` wrapper.
fn wrapper_pattern(text: &str) -> Option<ComponentPattern> {
    if contains_call(text, "forwardRef") {
        Some(ComponentPattern::ForwardRef)
    } else if contains_call(text, "memo") {
        Some(ComponentPattern::Memo)
    } else if contains_call(text, "lazy") {
        Some(ComponentPattern::Lazy)
    } else {
        None
    }
}

fn contains_call(text: &str, callee: &str) -> bool {
    let needle = format!("{}(", callee);
    let mut from = 0;
    while let Some(pos) = text[from..].find(&needle) {
        let abs = from + pos;
        let preceded_by_ident = abs > 0
            && text[..abs]
                .chars()
                .next_back()
                .map(|c| c.is_ascii_alphanumeric() || c == '_')
                .unwrap_or(false);
        if !preceded_by_ident {
            return true;
        }
        from = abs + needle.len();
    }
    false
}

/// Cyclomatic and cognitive complexity plus non-blank LOC for a declaration.
pub fn complexity_of(node: Node, source: &[u8]) -> ComplexityMetrics {
    let mut cyclomatic = 1;
    walk_tree(node, &mut |n| {
        if is_branching(n.kind()) {
            cyclomatic += 1;
        }
    });

    ComplexityMetrics {
        cyclomatic,
        cognitive: cognitive_complexity(node, 0),
        lines_of_code: non_blank_lines(node, source),
    }
}

fn is_branching(kind: &str) -> bool {
    matches!(
        kind,
        "if_statement"
            | "ternary_expression"
            | "while_statement"
            | "for_statement"
            | "for_in_statement"
            | "switch_case"
            | "catch_clause"
    )
}

/// Each branching construct costs `1 + nesting depth`; only `if`/`while`/
/// `for`/`catch` bodies increase the depth (not `switch`, not ternaries).
fn cognitive_complexity(node: Node, depth: usize) -> usize {
    let mut total = 0;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let (cost, child_depth) = match child.kind() {
            "if_statement" | "while_statement" | "for_statement" | "for_in_statement"
            | "catch_clause" => (1 + depth, depth + 1),
            "ternary_expression" | "switch_case" => (1 + depth, depth),
            _ => (0, depth),
        };
        total += cost + cognitive_complexity(child, child_depth);
    }
    total
}
