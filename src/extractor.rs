use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;
use tree_sitter::{Node, Tree};

use crate::parser::ast_utils::*;
use crate::parser::symbols::*;

/// Extracts and reconciles prop definitions for one component.
///
/// Each strategy is a pure function over the file's text and syntax tree
/// that either declines (`None`) or yields a confidence-scored partial prop
/// list. The merge step reconciles the results into one canonical set;
/// extraction never fails to the caller.
pub fn extract_props(
    tree: &Tree,
    source: &str,
    framework: Framework,
    component: &str,
) -> Vec<PropDescriptor> {
    let input = StrategyInput {
        root: tree.root_node(),
        source: source.as_bytes(),
        text: source,
        framework,
        component,
    };

    let strategies: [fn(&StrategyInput) -> Option<ExtractionResult>; 5] = [
        typed_declaration,
        prop_validators,
        default_values,
        framework_options,
        reactive_bindings,
    ];

    let results: Vec<ExtractionResult> = strategies
        .iter()
        .filter_map(|strategy| strategy(&input))
        .collect();

    merge_extraction_results(results)
}

struct StrategyInput<'a> {
    root: Node<'a>,
    source: &'a [u8],
    text: &'a str,
    framework: Framework,
    component: &'a str,
}

/// Reconcile per-strategy results into one prop list.
///
/// Results are ranked by confidence (descending, stable); the first
/// occurrence of a prop name wins, and lower-confidence occurrences only
/// back-fill fields the winner left unset. Output order is first-seen
/// order across the ranked list.
pub fn merge_extraction_results(mut results: Vec<ExtractionResult>) -> Vec<PropDescriptor> {
    results.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut merged: IndexMap<String, PropDescriptor> = IndexMap::new();
    for result in results {
        for prop in result.props {
            match merged.get_mut(&prop.name) {
                None => {
                    merged.insert(prop.name.clone(), prop);
                }
                Some(existing) => {
                    if existing.prop_type == "any" && prop.prop_type != "any" {
                        existing.prop_type = prop.prop_type;
                    }
                    if existing.default_value.is_none() {
                        existing.default_value = prop.default_value;
                    }
                    if existing.description.is_none() {
                        existing.description = prop.description;
                    }
                    if existing.deprecated.is_none() {
                        existing.deprecated = prop.deprecated;
                    }
                    if existing.deprecation_message.is_none() {
                        existing.deprecation_message = prop.deprecation_message;
                    }
                }
            }
        }
    }

    merged.into_values().collect()
}

// ── Strategy: typed interface / type alias (confidence 1.0) ──

fn typed_declaration(input: &StrategyInput) -> Option<ExtractionResult> {
    let decl = find_props_declaration(input.root, input.source, input.component)?;

    let members = match decl.kind() {
        "interface_declaration" => decl.child_by_field_name("body")?,
        "type_alias_declaration" => {
            let value = decl.child_by_field_name("value")?;
            if value.kind() != "object_type" {
                return None;
            }
            value
        }
        _ => return None,
    };

    let mut props = Vec::new();
    let mut cursor = members.walk();
    for member in members.children(&mut cursor) {
        if member.kind() != "property_signature" {
            continue;
        }
        let Some(name_node) = member.child_by_field_name("name") else {
            continue;
        };

        let optional = {
            let mut mcursor = member.walk();
            member.children(&mut mcursor).any(|c| c.kind() == "?")
        };
        let prop_type = member
            .child_by_field_name("type")
            .map(|t| normalize_type_text(node_text(t, input.source).trim_start_matches(':')))
            .unwrap_or_else(|| "any".to_string());

        let mut prop = PropDescriptor::new(
            trim_quotes(node_text(name_node, input.source)),
            prop_type,
            !optional,
        );
        if let Some(doc) = leading_jsdoc(member, input.source) {
            let (description, deprecated, message) = parse_jsdoc(&doc);
            prop.description = description;
            prop.deprecated = deprecated;
            prop.deprecation_message = message;
        }
        props.push(prop);
    }

    if props.is_empty() {
        return None;
    }
    Some(ExtractionResult {
        props,
        source: StrategySource::TypeDeclaration,
        confidence: 1.0,
    })
}

/// Find the type declaration feeding a component's props: an interface or
/// type alias named `<Component>Props`, or failing that, any `*Props`.
pub fn find_props_declaration<'a>(
    root: Node<'a>,
    source: &[u8],
    component: &str,
) -> Option<Node<'a>> {
    let preferred = format!("{}Props", component);
    let mut exact = None;
    let mut fallback = None;

    walk_tree(root, &mut |node| {
        if !matches!(
            node.kind(),
            "interface_declaration" | "type_alias_declaration"
        ) {
            return;
        }
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let name = node_text(name, source);
        if name == preferred && exact.is_none() {
            exact = Some(node);
        } else if name.ends_with("Props") && fallback.is_none() {
            fallback = Some(node);
        }
    });

    exact.or(fallback)
}

// ── Strategy: Component.propTypes = {...} (confidence 0.9) ──

fn prop_validators(input: &StrategyInput) -> Option<ExtractionResult> {
    let object = find_member_assignment(input, "propTypes")?;

    let mut props = Vec::new();
    for (name, value) in object_pairs(object, input.source) {
        let chain = node_text(value, input.source);
        props.push(PropDescriptor::new(
            name,
            map_validator_type(chain),
            chain.contains("isRequired"),
        ));
    }

    if props.is_empty() {
        return None;
    }
    Some(ExtractionResult {
        props,
        source: StrategySource::PropValidators,
        confidence: 0.9,
    })
}

/// Map a prop-types validator chain to a primitive type string. Structural
/// validators get coarse approximations; unrecognized chains default to any.
pub fn map_validator_type(chain: &str) -> &'static str {
    let validator = chain
        .split_once("PropTypes.")
        .map(|(_, rest)| rest)
        .unwrap_or(chain);
    let validator: String = validator
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    match validator.as_str() {
        "string" => "string",
        "number" => "number",
        "bool" => "boolean",
        "func" => "Function",
        "object" => "object",
        "array" => "any[]",
        "node" => "ReactNode",
        "element" => "ReactElement",
        "arrayOf" => "any[]",
        "objectOf" => "Record<string,any>",
        "shape" => "object",
        "oneOf" => "string|number",
        "oneOfType" => "any",
        _ => "any",
    }
}

// ── Strategy: Component.defaultProps = {...} (confidence 0.7) ──

fn default_values(input: &StrategyInput) -> Option<ExtractionResult> {
    let object = find_member_assignment(input, "defaultProps")?;

    let mut props = Vec::new();
    for (name, value) in object_pairs(object, input.source) {
        let mut prop = PropDescriptor::new(name, literal_type_of(value), false);
        prop.default_value = Some(node_text(value, input.source).to_string());
        props.push(prop);
    }

    if props.is_empty() {
        return None;
    }
    Some(ExtractionResult {
        props,
        source: StrategySource::DefaultValues,
        confidence: 0.7,
    })
}

// ── Strategy: Vue props option block (confidence 0.95) ──

fn framework_options(input: &StrategyInput) -> Option<ExtractionResult> {
    if input.framework != Framework::Vue {
        return None;
    }

    let mut props_value = None;
    walk_tree(input.root, &mut |node| {
        if node.kind() != "pair" || props_value.is_some() {
            return;
        }
        let Some(key) = node.child_by_field_name("key") else {
            return;
        };
        if trim_quotes(node_text(key, input.source)) != "props" {
            return;
        }
        if let Some(value) = node.child_by_field_name("value") {
            if matches!(value.kind(), "object" | "array") {
                props_value = Some(value);
            }
        }
    });
    let props_value = props_value?;

    let mut props = Vec::new();
    match props_value.kind() {
        // props: ['label', 'disabled']
        "array" => {
            let mut cursor = props_value.walk();
            for element in props_value.children(&mut cursor) {
                if element.kind() == "string" {
                    props.push(PropDescriptor::new(
                        trim_quotes(node_text(element, input.source)),
                        "any",
                        false,
                    ));
                }
            }
        }
        // props: { label: String, size: { type: String, required: true, default: 'md' } }
        "object" => {
            for (name, value) in object_pairs(props_value, input.source) {
                props.push(vue_prop_descriptor(name, value, input.source));
            }
        }
        _ => {}
    }

    if props.is_empty() {
        return None;
    }
    Some(ExtractionResult {
        props,
        source: StrategySource::FrameworkOptions,
        confidence: 0.95,
    })
}

fn vue_prop_descriptor(name: String, value: Node, source: &[u8]) -> PropDescriptor {
    if value.kind() != "object" {
        // Shorthand constructor form: `label: String`. Vue props are
        // optional unless required is explicit.
        return PropDescriptor::new(name, map_vue_type(node_text(value, source)), false);
    }

    let mut prop = PropDescriptor::new(name, "any", false);
    for (field, field_value) in object_pairs(value, source) {
        let text = node_text(field_value, source);
        match field.as_str() {
            "type" => prop.prop_type = map_vue_type(text).to_string(),
            "required" => prop.required = text == "true",
            "default" => prop.default_value = Some(text.to_string()),
            _ => {}
        }
    }
    prop
}

fn map_vue_type(constructor: &str) -> &'static str {
    match constructor {
        "String" => "string",
        "Number" => "number",
        "Boolean" => "boolean",
        "Array" => "any[]",
        "Object" => "object",
        "Function" => "Function",
        _ => "any",
    }
}

// ── Strategy: Svelte exported reactive bindings (confidence 0.95) ──

fn reactive_bindings(input: &StrategyInput) -> Option<ExtractionResult> {
    if input.framework != Framework::Svelte {
        return None;
    }

    static EXPORT_LET: OnceLock<Regex> = OnceLock::new();
    let pattern = EXPORT_LET.get_or_init(|| {
        Regex::new(r"export\s+let\s+(\w+)(?:\s*:\s*([^=;]+))?(?:\s*=\s*([^;]+))?;")
            .expect("export let pattern is valid")
    });

    let mut props = Vec::new();
    for captures in pattern.captures_iter(input.text) {
        let name = &captures[1];
        let prop_type = captures
            .get(2)
            .map(|m| normalize_type_text(m.as_str()))
            .unwrap_or_else(|| "any".to_string());
        let default_value = captures.get(3).map(|m| m.as_str().trim().to_string());

        let mut prop = PropDescriptor::new(name, prop_type, default_value.is_none());
        prop.default_value = default_value;
        props.push(prop);
    }

    if props.is_empty() {
        return None;
    }
    Some(ExtractionResult {
        props,
        source: StrategySource::ReactiveBindings,
        confidence: 0.95,
    })
}

// ── Shared helpers ──

/// Find `Component.<member> = {...}` and return the object literal.
fn find_member_assignment<'a>(input: &StrategyInput<'a>, member: &str) -> Option<Node<'a>> {
    let target = format!("{}.{}", input.component, member);
    let mut found = None;

    walk_tree(input.root, &mut |node| {
        if node.kind() != "assignment_expression" || found.is_some() {
            return;
        }
        let Some(left) = node.child_by_field_name("left") else {
            return;
        };
        if node_text(left, input.source) != target {
            return;
        }
        if let Some(right) = node.child_by_field_name("right") {
            if right.kind() == "object" {
                found = Some(right);
            }
        }
    });

    found
}

/// Iterate `key: value` pairs of an object literal, quote-stripped.
fn object_pairs<'a>(object: Node<'a>, source: &[u8]) -> Vec<(String, Node<'a>)> {
    let mut pairs = Vec::new();
    let mut cursor = object.walk();
    for child in object.children(&mut cursor) {
        if child.kind() != "pair" {
            continue;
        }
        let (Some(key), Some(value)) = (
            child.child_by_field_name("key"),
            child.child_by_field_name("value"),
        ) else {
            continue;
        };
        pairs.push((trim_quotes(node_text(key, source)).to_string(), value));
    }
    pairs
}

fn literal_type_of(value: Node) -> &'static str {
    match value.kind() {
        "string" | "template_string" => "string",
        "number" => "number",
        "true" | "false" => "boolean",
        "array" => "any[]",
        "object" => "object",
        "arrow_function" | "function_expression" | "function" => "Function",
        _ => "any",
    }
}

/// Collapse whitespace in a declared type so union literals read uniformly:
/// `'a' | 'b'` becomes `'a'|'b'`.
pub fn normalize_type_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" | ", "|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::source_parser::SourceParser;
    use std::path::PathBuf;

    fn extract(src: &str, framework: Framework, component: &str) -> Vec<PropDescriptor> {
        let file = match framework {
            Framework::Vue => "test.vue.js",
            _ => "test.tsx",
        };
        let path = PathBuf::from(file);
        let mut parser = SourceParser::new().unwrap();
        let tree = parser.parse(src, &path).unwrap();
        extract_props(&tree, src, framework, component)
    }

    #[test]
    fn extracts_typed_interface_props() {
        let src = r#"
interface ButtonProps {
  /** Visual style. */
  variant: 'primary' | 'secondary' | 'danger';
  disabled?: boolean;
  /** Old label. @deprecated use children */
  label?: string;
}
export function Button(props: ButtonProps) { return <button />; }
"#;
        let props = extract(src, Framework::React, "Button");

        assert_eq!(props.len(), 3);
        assert_eq!(props[0].name, "variant");
        assert_eq!(props[0].prop_type, "'primary'|'secondary'|'danger'");
        assert!(props[0].required);
        assert_eq!(props[0].description.as_deref(), Some("Visual style."));

        assert_eq!(props[1].name, "disabled");
        assert_eq!(props[1].prop_type, "boolean");
        assert!(!props[1].required);

        assert_eq!(props[2].deprecated, Some(true));
        assert_eq!(props[2].deprecation_message.as_deref(), Some("use children"));
    }

    #[test]
    fn extracts_prop_validator_chains() {
        let src = r#"
import PropTypes from 'prop-types';
function Tag(props) { return <span>{props.label}</span>; }
Tag.propTypes = {
  label: PropTypes.string.isRequired,
  count: PropTypes.number,
  onClick: PropTypes.func,
  items: PropTypes.arrayOf(PropTypes.string),
  kind: PropTypes.oneOf(['a', 'b']),
};
"#;
        let props = extract(src, Framework::React, "Tag");

        assert_eq!(props.len(), 5);
        assert_eq!(props[0].prop_type, "string");
        assert!(props[0].required);
        assert_eq!(props[1].prop_type, "number");
        assert!(!props[1].required);
        assert_eq!(props[2].prop_type, "Function");
        assert_eq!(props[3].prop_type, "any[]");
        assert_eq!(props[4].prop_type, "string|number");
    }

    #[test]
    fn default_props_backfill_lower_confidence_fields() {
        let src = r#"
import PropTypes from 'prop-types';
function Tag(props) { return <span />; }
Tag.propTypes = { size: PropTypes.string };
Tag.defaultProps = { size: 'md', hidden: false };
"#;
        let props = extract(src, Framework::React, "Tag");

        assert_eq!(props.len(), 2);
        // Validator strategy won on type, defaults back-filled the value.
        assert_eq!(props[0].name, "size");
        assert_eq!(props[0].prop_type, "string");
        assert_eq!(props[0].default_value.as_deref(), Some("'md'"));
        // Known only to defaultProps.
        assert_eq!(props[1].name, "hidden");
        assert_eq!(props[1].prop_type, "boolean");
        assert!(!props[1].required);
    }

    #[test]
    fn higher_confidence_type_is_never_overwritten() {
        let results = vec![
            ExtractionResult {
                props: vec![PropDescriptor::new("x", "number", false)],
                source: StrategySource::DefaultValues,
                confidence: 0.7,
            },
            ExtractionResult {
                props: vec![PropDescriptor::new("x", "string", true)],
                source: StrategySource::TypeDeclaration,
                confidence: 1.0,
            },
        ];

        let merged = merge_extraction_results(results);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].prop_type, "string");
        assert!(merged[0].required);
    }

    #[test]
    fn merged_props_are_unique_by_name() {
        let src = r#"
interface CardProps { title: string; }
function Card(props: CardProps) { return <div>{props.title}</div>; }
Card.propTypes = { title: PropTypes.string };
Card.defaultProps = { title: 'untitled' };
"#;
        let props = extract(src, Framework::React, "Card");
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].prop_type, "string");
        assert_eq!(props[0].default_value.as_deref(), Some("'untitled'"));
    }

    #[test]
    fn extracts_vue_option_block() {
        let src = r#"
import { defineComponent } from 'vue';
export default defineComponent({
  name: 'Badge',
  props: {
    label: String,
    size: { type: String, required: true },
    count: { type: Number, default: 0 },
  },
});
"#;
        let props = extract(src, Framework::Vue, "Badge");

        assert_eq!(props.len(), 3);
        assert_eq!(props[0].prop_type, "string");
        assert!(!props[0].required);
        assert!(props[1].required);
        assert_eq!(props[2].default_value.as_deref(), Some("0"));
    }

    #[test]
    fn extracts_vue_array_props() {
        let src = "export default { props: ['label', 'disabled'] };";
        let props = extract(src, Framework::Vue, "Widget");

        assert_eq!(props.len(), 2);
        assert_eq!(props[0].name, "label");
        assert_eq!(props[0].prop_type, "any");
    }

    #[test]
    fn extracts_svelte_export_let_bindings() {
        let src = r#"
import { onMount } from 'svelte';
export let label: string;
export let size = 'md';
export let disabled;
"#;
        let path = PathBuf::from("Button.svelte");
        let mut parser = SourceParser::new().unwrap();
        let tree = parser.parse(src, &path).unwrap();
        let props = extract_props(&tree, src, Framework::Svelte, "Button");

        assert_eq!(props.len(), 3);
        assert_eq!(props[0].name, "label");
        assert_eq!(props[0].prop_type, "string");
        assert!(props[0].required);
        assert_eq!(props[1].default_value.as_deref(), Some("'md'"));
        assert!(!props[1].required);
        assert_eq!(props[2].prop_type, "any");
        assert!(props[2].required);
    }

    #[test]
    fn strategies_decline_when_nothing_matches() {
        let src = "export function plain() { return 1; }";
        assert!(extract(src, Framework::React, "Plain").is_empty());
    }
}
