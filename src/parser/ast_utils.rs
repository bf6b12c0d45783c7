use tree_sitter::Node;

use crate::parser::symbols::SourceLocation;

/// Safe wrapper around node.utf8_text that handles encoding errors gracefully.
pub fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Strip matching single or double quotes from a string literal's text.
pub fn trim_quotes(text: &str) -> &str {
    text.trim_matches(|c| c == '\'' || c == '"' || c == '`')
}

/// 1-based start/end location for a node.
pub fn location_of(node: Node) -> SourceLocation {
    SourceLocation {
        start_line: node.start_position().row + 1,
        start_column: node.start_position().column + 1,
        end_line: node.end_position().row + 1,
        end_column: node.end_position().column + 1,
    }
}

/// Find the first child node of any of the specified kinds.
pub fn find_child_of_kind<'a>(node: Node<'a>, kinds: &[&str]) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find(|child| kinds.contains(&child.kind()))
}

/// Pre-order traversal calling `visit` on every node in the subtree.
pub fn walk_tree<'a, F>(node: Node<'a>, visit: &mut F)
where
    F: FnMut(Node<'a>),
{
    visit(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_tree(child, visit);
    }
}

/// Whether the subtree contains a JSX element or fragment.
pub fn contains_jsx(node: Node) -> bool {
    if matches!(
        node.kind(),
        "jsx_element" | "jsx_self_closing_element" | "jsx_fragment"
    ) {
        return true;
    }
    let mut cursor = node.walk();
    node.children(&mut cursor).any(contains_jsx)
}

/// Tag name of a JSX element node, if it has one.
pub fn jsx_tag_name<'a>(node: Node, source: &'a [u8]) -> Option<&'a str> {
    let named = match node.kind() {
        "jsx_self_closing_element" => node.child_by_field_name("name"),
        "jsx_element" => node
            .child(0)
            .filter(|n| n.kind() == "jsx_opening_element")
            .and_then(|open| open.child_by_field_name("name")),
        _ => None,
    }?;
    Some(node_text(named, source))
}

/// Collect capitalized JSX tag names in the subtree (component fan-out).
/// Lowercase tags are host elements, not dependencies.
pub fn collect_component_tags(node: Node, source: &[u8], tags: &mut Vec<String>) {
    if let Some(name) = jsx_tag_name(node, source) {
        let base = name.split('.').next().unwrap_or(name);
        if base.starts_with(|c: char| c.is_ascii_uppercase()) && !tags.iter().any(|t| t == name) {
            tags.push(name.to_string());
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_component_tags(child, source, tags);
    }
}

/// Extract the JSDoc block immediately preceding `node`, if any.
pub fn leading_jsdoc(node: Node, source: &[u8]) -> Option<String> {
    let prev = node.prev_sibling()?;
    if prev.kind() != "comment" {
        return None;
    }
    let text = node_text(prev, source);
    if !text.starts_with("/**") {
        return None;
    }

    let body = text
        .trim_start_matches("/**")
        .trim_end_matches("*/")
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if body.is_empty() { None } else { Some(body) }
}

/// Split a JSDoc body into a description and an optional `@deprecated`
/// message. Returns `(description, deprecated, deprecation_message)`.
pub fn parse_jsdoc(doc: &str) -> (Option<String>, Option<bool>, Option<String>) {
    match doc.find("@deprecated") {
        Some(idx) => {
            let description = doc[..idx].trim();
            let message = doc[idx + "@deprecated".len()..]
                .split('@')
                .next()
                .unwrap_or("")
                .trim();
            (
                (!description.is_empty()).then(|| description.to_string()),
                Some(true),
                (!message.is_empty()).then(|| message.to_string()),
            )
        }
        None => (Some(doc.to_string()), None, None),
    }
}

/// Count non-blank lines in the source span of a node.
pub fn non_blank_lines(node: Node, source: &[u8]) -> usize {
    let text = node_text(node, source);
    text.lines().filter(|line| !line.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::source_parser::SourceParser;
    use std::path::PathBuf;

    fn parse(src: &str) -> tree_sitter::Tree {
        let mut parser = SourceParser::new().unwrap();
        parser.parse(src, &PathBuf::from("test.tsx")).unwrap()
    }

    #[test]
    fn detects_jsx_in_subtree() {
        let tree = parse("function A() { return <div>hi</div>; }");
        assert!(contains_jsx(tree.root_node()));

        let tree = parse("function a() { return 1; }");
        assert!(!contains_jsx(tree.root_node()));
    }

    #[test]
    fn collects_capitalized_tags_only() {
        let src = "const A = () => <div><Button /><Icon.Left /><span /></div>;";
        let tree = parse(src);
        let mut tags = Vec::new();
        collect_component_tags(tree.root_node(), src.as_bytes(), &mut tags);
        assert_eq!(tags, vec!["Button".to_string(), "Icon.Left".to_string()]);
    }

    #[test]
    fn parses_deprecated_jsdoc() {
        let (desc, deprecated, message) =
            parse_jsdoc("The label text. @deprecated use title instead");
        assert_eq!(desc.as_deref(), Some("The label text."));
        assert_eq!(deprecated, Some(true));
        assert_eq!(message.as_deref(), Some("use title instead"));
    }
}
