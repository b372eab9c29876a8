//! Type-shape normalization
//!
//! Reduces every dereferenced property to exactly one concrete type tag,
//! resolving multi-valued `type` fields and `oneOf`/`anyOf` unions. The
//! normalization trades full fidelity for a small, bounded vocabulary the
//! rest of the platform can render and validate uniformly; every lossy
//! rule here is intentional.

use crate::schema::{AdditionalProperties, OrderedMap, Property, SchemaType, TypeField};
use asset_spec_generator_common::{Result, SpecError};

/// Normalize one property and its whole subtree.
pub fn normalize_tree(prop: &Property, path: &str) -> Result<Property> {
    let mut out = normalize(prop, path)?;

    if let Some(properties) = out.properties.take() {
        let mut normalized = OrderedMap::new();
        for (name, child) in properties.iter() {
            let child_path = format!("{path}/{name}");
            normalized.insert(name.clone(), normalize_tree(child, &child_path)?);
        }
        out.properties = Some(normalized);
    }

    if let Some(patterns) = out.pattern_properties.take() {
        let mut normalized = OrderedMap::new();
        for (pattern, child) in patterns.iter() {
            let child_path = format!("{path}[pattern]");
            normalized.insert(pattern.clone(), normalize_tree(child, &child_path)?);
        }
        out.pattern_properties = Some(normalized);
    }

    if let Some(AdditionalProperties::Schema(child)) = out.additional_properties.take() {
        let child_path = format!("{path}[additionalProperties]");
        out.additional_properties = Some(AdditionalProperties::Schema(Box::new(normalize_tree(
            &child,
            &child_path,
        )?)));
    }

    if let Some(items) = out.items.take() {
        let child_path = format!("{path}[items]");
        out.items = Some(Box::new(normalize_tree(&items, &child_path)?));
    }

    Ok(out)
}

/// Normalize the shape of a single property (children untouched).
pub fn normalize(prop: &Property, path: &str) -> Result<Property> {
    if let Some(branches) = &prop.one_of {
        return merge_one_of(prop, branches, path);
    }
    if let Some(branches) = &prop.any_of {
        return merge_any_of(prop, branches, path);
    }

    match &prop.type_field {
        // Already single-tagged: unchanged.
        Some(TypeField::Single(_)) => Ok(prop.clone()),

        Some(TypeField::Multiple(types)) => retag_multi(prop, types, path),

        None => {
            if prop.is_object_like() {
                let mut out = prop.clone();
                out.type_field = Some(TypeField::Single(SchemaType::Object));
                Ok(out)
            } else if prop.reference.is_some() {
                // Only a stale reference marker remains; the value behind
                // it is gone, so all we can store is its text.
                let mut out = prop.clone();
                out.reference = None;
                out.type_field = Some(TypeField::Single(SchemaType::String));
                Ok(out)
            } else {
                // Open shape; the builder decides whether it is usable.
                Ok(prop.clone())
            }
        }
    }
}

/// Resolve a multi-valued `type` to the single non-string member.
fn retag_multi(prop: &Property, types: &[SchemaType], path: &str) -> Result<Property> {
    let concrete: Vec<SchemaType> = types
        .iter()
        .copied()
        .filter(|t| *t != SchemaType::Null)
        .collect();

    let picked = match concrete.as_slice() {
        [single] => *single,
        [a, b] if *a == SchemaType::String => *b,
        [a, b] if *b == SchemaType::String => *a,
        _ => {
            return Err(SpecError::AmbiguousType {
                path: path.to_string(),
            })
        }
    };

    let mut out = prop.clone();
    match picked {
        SchemaType::Boolean | SchemaType::Integer | SchemaType::Number | SchemaType::String => {
            out.type_field = Some(TypeField::Single(picked));
        }
        // "string or object": structural fidelity intentionally dropped in
        // favor of an opaque json string.
        SchemaType::Object | SchemaType::Json => {
            out.type_field = Some(TypeField::Single(SchemaType::Json));
            out.properties = None;
            out.pattern_properties = None;
            out.additional_properties = None;
        }
        // "T or many T" always ships an items schema in practice; absence
        // flags a genuinely new vendor pattern.
        SchemaType::Array => {
            if out.items.is_none() {
                return Err(SpecError::MissingItems {
                    path: path.to_string(),
                });
            }
            out.type_field = Some(TypeField::Single(SchemaType::Array));
        }
        SchemaType::Null => {
            return Err(SpecError::AmbiguousType {
                path: path.to_string(),
            })
        }
    }
    Ok(out)
}

/// Merge `oneOf` branches into one object keyed by branch title. A single
/// array-typed branch takes precedence over the merged object; two or more
/// array branches are an explicit unhandled case.
fn merge_one_of(prop: &Property, branches: &[Property], path: &str) -> Result<Property> {
    let normalized = normalize_branches(branches, path)?;

    let array_branches: Vec<&Property> = normalized
        .iter()
        .filter(|b| b.single_type() == Some(SchemaType::Array))
        .collect();

    match array_branches.as_slice() {
        [] => {}
        [array_branch] => {
            if array_branch.is_object_like() {
                return Err(SpecError::AmbiguousUnion {
                    path: path.to_string(),
                    reason: "branch is simultaneously array- and object-shaped".to_string(),
                });
            }
            let mut out = (*array_branch).clone();
            out.title = prop.title.clone().or(out.title);
            out.description = prop.description.clone().or(out.description);
            return Ok(out);
        }
        _ => {
            return Err(SpecError::AmbiguousUnion {
                path: path.to_string(),
                reason: format!("{} array branches", array_branches.len()),
            })
        }
    }

    let mut out = Property {
        type_field: Some(TypeField::Single(SchemaType::Object)),
        title: prop.title.clone(),
        description: prop.description.clone(),
        ..Default::default()
    };
    out.properties = Some(merge_titled_branches(&normalized, path)?);
    Ok(out)
}

/// Merge `anyOf`: one object when every branch is object-like and titled,
/// otherwise the whole node degrades to an opaque json scalar.
fn merge_any_of(prop: &Property, branches: &[Property], path: &str) -> Result<Property> {
    let normalized = normalize_branches(branches, path)?;

    let all_mergeable = !normalized.is_empty()
        && normalized
            .iter()
            .all(|b| b.is_object_like() && b.title.is_some());

    if all_mergeable {
        let mut out = Property {
            type_field: Some(TypeField::Single(SchemaType::Object)),
            title: prop.title.clone(),
            description: prop.description.clone(),
            ..Default::default()
        };
        out.properties = Some(merge_titled_branches(&normalized, path)?);
        return Ok(out);
    }

    Ok(Property {
        type_field: Some(TypeField::Single(SchemaType::Json)),
        title: prop.title.clone(),
        description: prop.description.clone(),
        ..Default::default()
    })
}

fn normalize_branches(branches: &[Property], path: &str) -> Result<Vec<Property>> {
    branches
        .iter()
        .enumerate()
        .map(|(i, branch)| normalize(branch, &format!("{path}[{i}]")))
        .collect()
}

fn merge_titled_branches(branches: &[Property], path: &str) -> Result<OrderedMap<Property>> {
    let mut merged = OrderedMap::new();
    for branch in branches {
        let title = branch
            .title
            .clone()
            .ok_or_else(|| SpecError::UntitledBranch {
                path: path.to_string(),
            })?;
        if branch.is_object_like() {
            merged.insert(title, branch.clone());
        } else {
            // Titled but property-less: an opaque json string field of the
            // same name.
            merged.insert(
                title.clone(),
                Property {
                    type_field: Some(TypeField::Single(SchemaType::Json)),
                    title: Some(title),
                    description: branch.description.clone(),
                    ..Default::default()
                },
            );
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(json: &str) -> Property {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_single_tag_unchanged() {
        let p = prop(r#"{"type": "string", "description": "plain"}"#);
        assert_eq!(normalize(&p, "/P").unwrap(), p);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            r#"{"type": ["string", "boolean"]}"#,
            r#"{"type": ["string", "object"], "properties": {"X": {"type": "string"}}}"#,
            r#"{"properties": {"X": {"type": "string"}}}"#,
            r#"{"oneOf": [
                {"title": "A", "type": "object", "properties": {"X": {"type": "string"}}},
                {"title": "B", "type": "object", "properties": {"Y": {"type": "string"}}}
            ]}"#,
            r#"{"anyOf": [{"type": "string"}, {"type": "integer"}]}"#,
        ];
        for input in inputs {
            let once = normalize_tree(&prop(input), "/P").unwrap();
            let twice = normalize_tree(&once, "/P").unwrap();
            assert_eq!(once, twice, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_multi_type_mapping_table() {
        let cases = [
            (r#"{"type": ["string", "boolean"]}"#, SchemaType::Boolean),
            (r#"{"type": ["string", "integer"]}"#, SchemaType::Integer),
            (r#"{"type": ["string", "number"]}"#, SchemaType::Number),
            (
                r#"{"type": ["string", "object"], "properties": {"X": {"type": "string"}}}"#,
                SchemaType::Json,
            ),
            (
                r#"{"type": ["string", "array"], "items": {"type": "string"}}"#,
                SchemaType::Array,
            ),
        ];
        for (input, expected) in cases {
            let normalized = normalize(&prop(input), "/P").unwrap();
            assert_eq!(normalized.single_type(), Some(expected), "for {input}");
        }
        // The json degradation drops structure.
        let json_case = normalize(
            &prop(r#"{"type": ["string", "object"], "properties": {"X": {"type": "string"}}}"#),
            "/P",
        )
        .unwrap();
        assert!(json_case.properties.is_none());
    }

    #[test]
    fn test_string_array_without_items_is_fatal() {
        let err = normalize(&prop(r#"{"type": ["string", "array"]}"#), "/P").unwrap_err();
        assert!(matches!(err, SpecError::MissingItems { .. }));
    }

    #[test]
    fn test_nullable_type_collapses_to_member() {
        let normalized = normalize(&prop(r#"{"type": ["string", "null"]}"#), "/P").unwrap();
        assert_eq!(normalized.single_type(), Some(SchemaType::String));
    }

    #[test]
    fn test_one_of_merges_by_title() {
        let normalized = normalize(
            &prop(
                r#"{"oneOf": [
                    {"title": "Basic", "type": "object", "properties": {"A": {"type": "string"}}},
                    {"title": "Advanced", "type": "object", "properties": {"B": {"type": "string"}}}
                ]}"#,
            ),
            "/P",
        )
        .unwrap();
        assert_eq!(normalized.single_type(), Some(SchemaType::Object));
        let properties = normalized.properties.as_ref().unwrap();
        assert!(properties.contains_key("Basic"));
        assert!(properties.contains_key("Advanced"));
    }

    #[test]
    fn test_one_of_array_branch_takes_precedence() {
        let normalized = normalize(
            &prop(
                r#"{"oneOf": [
                    {"type": "array", "items": {"type": "string"}},
                    {"title": "One", "type": "object", "properties": {"A": {"type": "string"}}}
                ]}"#,
            ),
            "/P",
        )
        .unwrap();
        assert_eq!(normalized.single_type(), Some(SchemaType::Array));
    }

    #[test]
    fn test_one_of_two_array_branches_is_fatal() {
        let err = normalize(
            &prop(
                r#"{"oneOf": [
                    {"type": "array", "items": {"type": "string"}},
                    {"type": "array", "items": {"type": "integer"}}
                ]}"#,
            ),
            "/P",
        )
        .unwrap_err();
        assert!(matches!(err, SpecError::AmbiguousUnion { .. }));
    }

    #[test]
    fn test_one_of_untitled_branch_is_fatal() {
        let err = normalize(
            &prop(r#"{"oneOf": [{"type": "object", "properties": {"A": {"type": "string"}}}]}"#),
            "/P",
        )
        .unwrap_err();
        assert!(matches!(err, SpecError::UntitledBranch { .. }));
    }

    #[test]
    fn test_one_of_titled_propertyless_branch_degrades_to_json_field() {
        let normalized = normalize(
            &prop(
                r#"{"oneOf": [
                    {"title": "Inline", "type": "object", "properties": {"A": {"type": "string"}}},
                    {"title": "Opaque", "type": "string"}
                ]}"#,
            ),
            "/P",
        )
        .unwrap();
        let properties = normalized.properties.as_ref().unwrap();
        assert_eq!(
            properties.get("Opaque").unwrap().single_type(),
            Some(SchemaType::Json)
        );
    }

    #[test]
    fn test_any_of_all_object_like_merges() {
        let normalized = normalize(
            &prop(
                r#"{"anyOf": [
                    {"title": "A", "properties": {"X": {"type": "string"}}},
                    {"title": "B", "properties": {"Y": {"type": "string"}}}
                ]}"#,
            ),
            "/P",
        )
        .unwrap();
        assert_eq!(normalized.single_type(), Some(SchemaType::Object));
        assert!(normalized.properties.as_ref().unwrap().contains_key("A"));
    }

    #[test]
    fn test_any_of_mixed_degrades_to_json_scalar() {
        let normalized = normalize(
            &prop(
                r#"{"anyOf": [
                    {"title": "A", "properties": {"X": {"type": "string"}}},
                    {"type": "integer"}
                ]}"#,
            ),
            "/P",
        )
        .unwrap();
        assert_eq!(normalized.single_type(), Some(SchemaType::Json));
        assert!(normalized.properties.is_none());
    }

    #[test]
    fn test_untagged_object_like_infers_object() {
        let normalized =
            normalize(&prop(r#"{"properties": {"X": {"type": "string"}}}"#), "/P").unwrap();
        assert_eq!(normalized.single_type(), Some(SchemaType::Object));
    }

    #[test]
    fn test_stale_reference_marker_infers_string() {
        let normalized = normalize(&prop(r##"{"$ref": "#/definitions/Gone"}"##), "/P").unwrap();
        assert_eq!(normalized.single_type(), Some(SchemaType::String));
        assert!(normalized.reference.is_none());
    }
}
