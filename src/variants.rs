use indexmap::IndexMap;
use tree_sitter::{Node, Tree};

use crate::parser::ast_utils::*;
use crate::parser::symbols::{PropDescriptor, Variant};

/// Tag names tried for polymorphic `as`/`component` props.
const COMMON_ELEMENT_TAGS: &[&str] = &["div", "span", "button", "a", "section", "article"];

/// Infer semantic variants from a component's prop shapes.
///
/// Every heuristic runs; overlapping results (the same prop often triggers
/// several) are resolved by [`merge_variants`].
pub fn detect_variants(props: &[PropDescriptor]) -> Vec<Variant> {
    let mut raw = Vec::new();

    raw.extend(discriminated_union_variants(props));
    raw.extend(enum_like_variants(props));
    raw.extend(boolean_variants(props));
    raw.extend(element_tag_variants(props));
    raw.extend(size_variants(props));
    raw.extend(color_theme_variants(props));
    raw.extend(generic_variant_prop(props));

    merge_variants(raw)
}

/// Deduplicate by `(discriminator, discriminator_value)`. The first
/// occurrence wins the variant's primary fields; `additional_props` from
/// later duplicates are unioned in by prop name.
pub fn merge_variants(variants: Vec<Variant>) -> Vec<Variant> {
    let mut merged: IndexMap<String, Variant> = IndexMap::new();
    for variant in variants {
        match merged.get_mut(&variant.dedup_key()) {
            None => {
                merged.insert(variant.dedup_key(), variant);
            }
            Some(existing) => {
                for prop in variant.additional_props {
                    if !existing.additional_props.contains(&prop) {
                        existing.additional_props.push(prop);
                    }
                }
            }
        }
    }
    merged.into_values().collect()
}

// ── Prop-shape heuristics ──

/// A parenthesis-free union of quoted literals yields one variant per
/// literal, discriminated by the prop itself.
fn discriminated_union_variants(props: &[PropDescriptor]) -> Vec<Variant> {
    let mut variants = Vec::new();
    for prop in props {
        if !is_literal_union(&prop.prop_type) {
            continue;
        }
        for value in quoted_literals(&prop.prop_type) {
            variants.push(Variant::new(value.clone(), &prop.name, value));
        }
    }
    variants
}

/// A `variant`/`type`/`kind` prop typed as a bare capitalized identifier is
/// enum-backed; the value set is unknowable without type resolution, so a
/// single sentinel variant is emitted.
fn enum_like_variants(props: &[PropDescriptor]) -> Vec<Variant> {
    props
        .iter()
        .filter(|prop| {
            let name = prop.name.to_ascii_lowercase();
            (name.contains("variant") || name.contains("type") || name.contains("kind"))
                && is_type_reference(&prop.prop_type)
        })
        .map(|prop| Variant::new(format!("{}_enum", prop.name), &prop.name, "enum"))
        .collect()
}

fn boolean_variants(props: &[PropDescriptor]) -> Vec<Variant> {
    let mut variants = Vec::new();
    for prop in props {
        if prop.prop_type == "boolean" || prop.prop_type == "bool" {
            for value in ["true", "false"] {
                variants.push(Variant::new(
                    format!("{}_{}", prop.name, value),
                    &prop.name,
                    value,
                ));
            }
        }
    }
    variants
}

fn element_tag_variants(props: &[PropDescriptor]) -> Vec<Variant> {
    let mut variants = Vec::new();
    for prop in props {
        if prop.name == "as" || prop.name == "component" {
            for tag in COMMON_ELEMENT_TAGS {
                variants.push(Variant::new(
                    format!("{}_{}", prop.name, tag),
                    &prop.name,
                    *tag,
                ));
            }
        }
    }
    variants
}

fn size_variants(props: &[PropDescriptor]) -> Vec<Variant> {
    props
        .iter()
        .filter(|prop| prop.name == "size")
        .flat_map(|prop| {
            quoted_literals(&prop.prop_type)
                .into_iter()
                .map(|value| Variant::new(value.clone(), &prop.name, value))
        })
        .collect()
}

fn color_theme_variants(props: &[PropDescriptor]) -> Vec<Variant> {
    props
        .iter()
        .filter(|prop| matches!(prop.name.as_str(), "color" | "variant" | "theme"))
        .flat_map(|prop| {
            quoted_literals(&prop.prop_type).into_iter().map(|value| {
                Variant::new(format!("{}_{}", prop.name, value), &prop.name, value)
            })
        })
        .collect()
}

fn generic_variant_prop(props: &[PropDescriptor]) -> Vec<Variant> {
    props
        .iter()
        .filter(|prop| prop.name == "variant")
        .flat_map(|prop| {
            quoted_literals(&prop.prop_type)
                .into_iter()
                .map(|value| Variant::new(format!("variant_{}", value), &prop.name, value))
        })
        .collect()
}

// ── Source-level augmentation ──

/// Variants from a named type alias defined as a union of object-literal
/// types. The discriminator is a property whose type is a quoted literal in
/// every union member; each member becomes one variant carrying its other
/// property names as `additional_props`. No common literal property, no
/// variants.
pub fn detect_variants_from_source(tree: &Tree, source: &str, type_name: &str) -> Vec<Variant> {
    let src = source.as_bytes();
    let mut alias = None;
    walk_tree(tree.root_node(), &mut |node| {
        if node.kind() != "type_alias_declaration" || alias.is_some() {
            return;
        }
        if let Some(name) = node.child_by_field_name("name") {
            if node_text(name, src) == type_name {
                alias = Some(node);
            }
        }
    });
    let Some(alias) = alias else {
        return Vec::new();
    };
    let Some(value) = alias.child_by_field_name("value") else {
        return Vec::new();
    };
    if value.kind() != "union_type" {
        return Vec::new();
    }

    let mut members = Vec::new();
    flatten_union(value, &mut members);

    let member_props: Vec<Vec<(String, Option<String>)>> = members
        .iter()
        .filter(|m| m.kind() == "object_type")
        .map(|m| object_type_props(*m, src))
        .collect();
    if member_props.is_empty() || member_props.len() != members.len() {
        return Vec::new();
    }

    // A discriminator must be literal-typed in every member.
    let discriminator = member_props[0]
        .iter()
        .filter(|(_, literal)| literal.is_some())
        .map(|(name, _)| name.clone())
        .find(|name| {
            member_props.iter().all(|props| {
                props
                    .iter()
                    .any(|(n, literal)| n == name && literal.is_some())
            })
        });
    let Some(discriminator) = discriminator else {
        return Vec::new();
    };

    let mut variants = Vec::new();
    for props in &member_props {
        let Some(value) = props
            .iter()
            .find(|(name, _)| *name == discriminator)
            .and_then(|(_, literal)| literal.clone())
        else {
            continue;
        };

        let mut variant = Variant::new(value.clone(), &discriminator, value);
        variant.additional_props = props
            .iter()
            .filter(|(name, _)| *name != discriminator)
            .map(|(name, _)| name.clone())
            .collect();
        variants.push(variant);
    }

    merge_variants(variants)
}

fn flatten_union<'a>(node: Node<'a>, members: &mut Vec<Node<'a>>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "union_type" => flatten_union(child, members),
            "|" => {}
            _ => members.push(child),
        }
    }
}

/// Property names of an object type, paired with the quoted-literal value
/// of literal-typed properties.
fn object_type_props(object_type: Node, source: &[u8]) -> Vec<(String, Option<String>)> {
    let mut props = Vec::new();
    let mut cursor = object_type.walk();
    for member in object_type.children(&mut cursor) {
        if member.kind() != "property_signature" {
            continue;
        }
        let Some(name) = member.child_by_field_name("name") else {
            continue;
        };
        let type_text = member
            .child_by_field_name("type")
            .map(|t| node_text(t, source).trim_start_matches(':').trim().to_string());

        let literal = type_text.as_deref().and_then(|t| {
            let quoted = quoted_literals(t);
            if quoted.len() == 1 && !t.contains('|') {
                Some(quoted[0].clone())
            } else {
                None
            }
        });

        props.push((node_text(name, source).to_string(), literal));
    }
    props
}

// ── Type-string helpers ──

/// Parenthesis-free union of at least two quoted literals.
fn is_literal_union(type_text: &str) -> bool {
    if type_text.contains('(') || !type_text.contains('|') {
        return false;
    }
    let segments: Vec<&str> = type_text.split('|').map(str::trim).collect();
    segments.len() >= 2 && segments.iter().all(|s| is_quoted(s))
}

fn is_quoted(segment: &str) -> bool {
    (segment.len() >= 2)
        && ((segment.starts_with('\'') && segment.ends_with('\''))
            || (segment.starts_with('"') && segment.ends_with('"')))
}

/// Quoted-literal tokens of a type string, unquoted.
fn quoted_literals(type_text: &str) -> Vec<String> {
    let mut values = Vec::new();
    let bytes = type_text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let quote = bytes[i];
        if quote == b'\'' || quote == b'"' {
            if let Some(end) = type_text[i + 1..].find(quote as char) {
                values.push(type_text[i + 1..i + 1 + end].to_string());
                i += end + 2;
                continue;
            }
        }
        i += 1;
    }
    values
}

/// A bare capitalized identifier, i.e. a reference to a named type.
fn is_type_reference(type_text: &str) -> bool {
    let mut chars = type_text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::source_parser::SourceParser;
    use std::path::PathBuf;

    #[test]
    fn literal_union_yields_one_variant_per_value() {
        let props = vec![PropDescriptor::new(
            "variant",
            "'primary'|'secondary'|'danger'",
            true,
        )];
        let variants = detect_variants(&props);

        assert_eq!(variants.len(), 3);
        let values: Vec<_> = variants
            .iter()
            .map(|v| v.discriminator_value.as_str())
            .collect();
        assert_eq!(values, vec!["primary", "secondary", "danger"]);
        assert!(variants.iter().all(|v| v.discriminator == "variant"));
    }

    #[test]
    fn boolean_prop_yields_exactly_true_and_false() {
        let props = vec![PropDescriptor::new("disabled", "boolean", false)];
        let variants = detect_variants(&props);

        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].dedup_key(), "disabled:true");
        assert_eq!(variants[1].dedup_key(), "disabled:false");
    }

    #[test]
    fn overlapping_heuristics_deduplicate() {
        // `variant` triggers the union, color/theme and generic-variant
        // heuristics; `type` triggers the union heuristic.
        let props = vec![
            PropDescriptor::new("variant", "\"primary\"|\"secondary\"", true),
            PropDescriptor::new("type", "\"primary\"|\"secondary\"", true),
        ];
        let variants = detect_variants(&props);

        let mut keys: Vec<_> = variants.iter().map(Variant::dedup_key).collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total, "no duplicate (discriminator, value) pairs");

        let variant_keys = variants
            .iter()
            .filter(|v| v.discriminator == "variant")
            .count();
        assert_eq!(variant_keys, 2);
    }

    #[test]
    fn enum_like_prop_yields_sentinel() {
        let props = vec![PropDescriptor::new("kind", "BadgeKind", true)];
        let variants = detect_variants(&props);

        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].discriminator_value, "enum");
    }

    #[test]
    fn as_prop_yields_common_tags() {
        let props = vec![PropDescriptor::new("as", "React.ElementType", false)];
        let variants = detect_variants(&props);

        assert_eq!(variants.len(), 6);
        assert_eq!(variants[0].discriminator_value, "div");
        assert_eq!(variants[0].name, "as_div");
    }

    #[test]
    fn size_prop_parses_literal_tokens() {
        let props = vec![PropDescriptor::new("size", "'sm'|'md'|'lg'", false)];
        let variants = detect_variants(&props);

        let sizes: Vec<_> = variants
            .iter()
            .filter(|v| v.discriminator == "size")
            .map(|v| v.discriminator_value.as_str())
            .collect();
        assert_eq!(sizes, vec!["sm", "md", "lg"]);
    }

    #[test]
    fn parenthesized_unions_are_not_discriminated() {
        let props = vec![PropDescriptor::new("x", "('a'|'b')[]", false)];
        assert!(detect_variants(&props).is_empty());
    }

    #[test]
    fn source_union_with_discriminator_property() {
        let src = r#"
type AlertProps =
  | { kind: 'success'; onDismiss: () => void }
  | { kind: 'error'; error: Error; retry: () => void };
"#;
        let mut parser = SourceParser::new().unwrap();
        let tree = parser.parse(src, &PathBuf::from("alert.tsx")).unwrap();
        let variants = detect_variants_from_source(&tree, src, "AlertProps");

        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].discriminator, "kind");
        assert_eq!(variants[0].discriminator_value, "success");
        assert_eq!(variants[0].additional_props, vec!["onDismiss"]);
        assert_eq!(variants[1].discriminator_value, "error");
        assert_eq!(variants[1].additional_props, vec!["error", "retry"]);
    }

    #[test]
    fn source_union_without_common_property_is_empty() {
        let src = r#"
type MixedProps =
  | { kind: 'a' }
  | { other: 'b' };
"#;
        let mut parser = SourceParser::new().unwrap();
        let tree = parser.parse(src, &PathBuf::from("mixed.tsx")).unwrap();
        assert!(detect_variants_from_source(&tree, src, "MixedProps").is_empty());
    }

    #[test]
    fn merge_unions_additional_props_first_wins() {
        let mut a = Variant::new("solid", "look", "solid");
        a.additional_props = vec!["icon".to_string()];
        let mut b = Variant::new("solid-dup", "look", "solid");
        b.additional_props = vec!["icon".to_string(), "weight".to_string()];

        let merged = merge_variants(vec![a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "solid");
        assert_eq!(merged[0].additional_props, vec!["icon", "weight"]);
    }
}
