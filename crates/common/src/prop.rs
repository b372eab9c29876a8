//! The vendor-neutral property tree
//!
//! `PropSpec` is one node of the intermediate representation. Kinds form a
//! closed sum type so every consumer (builder, socket deriver, code
//! emitter) matches exhaustively and new kinds are compile-time-enforced
//! additions.

use crate::new_unique_id;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

/// Widget rendering hint attached to a prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetKind {
    Text,
    Checkbox,
    ComboBox,
    CodeEditor,
    Array,
    Map,
    Header,
    Secret,
}

/// One selectable option for a ComboBox widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetOption {
    pub label: String,
    pub value: String,
}

/// A value-completion hint: the front end offers values of `prop` on
/// schema `schema` when filling in the annotated prop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestSource {
    pub schema: String,
    pub prop: String,
}

/// Display-layer data for a prop. Everything here is advisory; the tree
/// shape and metadata carry the semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropSpecData {
    pub widget_kind: Option<WidgetKind>,
    pub widget_options: Vec<WidgetOption>,
    pub documentation: Option<String>,
    pub doc_link: Option<String>,
    pub hidden: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub suggest_sources: Vec<SuggestSource>,
}

impl Default for PropSpecData {
    fn default() -> Self {
        Self {
            widget_kind: None,
            widget_options: Vec::new(),
            documentation: None,
            doc_link: None,
            hidden: false,
            suggest_sources: Vec::new(),
        }
    }
}

/// Vendor-declared lifecycle classification for a prop. Set once at
/// construction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PropMetadata {
    pub create_only: bool,
    pub read_only: bool,
    pub write_only: bool,
    pub primary_identifier: bool,
    /// Path from the tree root, e.g. `["root", "domain", "BucketName"]`.
    pub prop_path: Vec<String>,
    pub required: bool,
}

/// The closed set of normalized prop kinds.
///
/// Array and map nodes own exactly one element-type child; object nodes own
/// zero or more named children. The tree is strict: every node has exactly
/// one parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PropKind {
    String,
    Number,
    Boolean,
    Json,
    Array { type_prop: Box<PropSpec> },
    Map { type_prop: Box<PropSpec> },
    Object { entries: Vec<PropSpec> },
}

impl PropKind {
    /// Short tag used in emitted code and logs.
    pub fn tag(&self) -> &'static str {
        match self {
            PropKind::String => "string",
            PropKind::Number => "number",
            PropKind::Boolean => "boolean",
            PropKind::Json => "json",
            PropKind::Array { .. } => "array",
            PropKind::Map { .. } => "map",
            PropKind::Object { .. } => "object",
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            PropKind::String | PropKind::Number | PropKind::Boolean | PropKind::Json
        )
    }
}

/// One node of the vendor-neutral IR tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropSpec {
    pub name: String,
    pub unique_id: String,
    pub data: PropSpecData,
    pub metadata: PropMetadata,
    #[serde(flatten)]
    pub kind: PropKind,
}

impl PropSpec {
    /// Create an empty object prop at the given parent path.
    pub fn new_object(name: &str, parent_path: &[String]) -> Self {
        let mut prop_path: Vec<String> = parent_path.to_vec();
        prop_path.push(name.to_string());
        Self {
            name: name.to_string(),
            unique_id: new_unique_id(),
            data: PropSpecData {
                widget_kind: Some(WidgetKind::Header),
                ..Default::default()
            },
            metadata: PropMetadata {
                prop_path,
                ..Default::default()
            },
            kind: PropKind::Object {
                entries: Vec::new(),
            },
        }
    }

    /// Create a scalar prop at the given parent path.
    pub fn new_scalar(name: &str, kind: PropKind, parent_path: &[String]) -> Self {
        debug_assert!(kind.is_scalar());
        let widget_kind = match kind {
            PropKind::Boolean => WidgetKind::Checkbox,
            PropKind::Json => WidgetKind::CodeEditor,
            _ => WidgetKind::Text,
        };
        let mut prop_path: Vec<String> = parent_path.to_vec();
        prop_path.push(name.to_string());
        Self {
            name: name.to_string(),
            unique_id: new_unique_id(),
            data: PropSpecData {
                widget_kind: Some(widget_kind),
                ..Default::default()
            },
            metadata: PropMetadata {
                prop_path,
                ..Default::default()
            },
            kind,
        }
    }

    /// Direct children of an object node; empty slice for everything else.
    pub fn entries(&self) -> &[PropSpec] {
        match &self.kind {
            PropKind::Object { entries } => entries,
            _ => &[],
        }
    }

    /// Find a direct child of an object node by case-insensitive name.
    pub fn find_child(&self, name: &str) -> Option<&PropSpec> {
        self.entries()
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Find a descendant by slash-separated path below this node.
    pub fn find_descendant(&self, path: &str) -> Option<&PropSpec> {
        let mut current = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = match &current.kind {
                PropKind::Object { entries } => {
                    entries.iter().find(|p| p.name.eq_ignore_ascii_case(segment))?
                }
                PropKind::Array { type_prop } | PropKind::Map { type_prop }
                    if type_prop.name.eq_ignore_ascii_case(segment) =>
                {
                    type_prop
                }
                _ => return None,
            };
        }
        Some(current)
    }

    /// Slash-joined path string, e.g. `/domain/BucketName`.
    pub fn path_str(&self) -> String {
        let tail = &self.metadata.prop_path[1.min(self.metadata.prop_path.len())..];
        format!("/{}", tail.join("/"))
    }
}

/// Walk a prop tree breadth-first, visiting every node exactly once.
///
/// Uses an explicit queue rather than the call stack so arbitrarily deep
/// trees stay bounded.
pub fn bfs_prop_tree<F>(root: &PropSpec, mut visit: F)
where
    F: FnMut(&PropSpec),
{
    let mut queue = VecDeque::new();
    queue.push_back(root);
    while let Some(prop) = queue.pop_front() {
        visit(prop);
        match &prop.kind {
            PropKind::String | PropKind::Number | PropKind::Boolean | PropKind::Json => {}
            PropKind::Array { type_prop } | PropKind::Map { type_prop } => {
                queue.push_back(type_prop.as_ref());
            }
            PropKind::Object { entries } => {
                for entry in entries {
                    queue.push_back(entry);
                }
            }
        }
    }
}

/// Mutable breadth-first walk over a prop tree.
pub fn bfs_prop_tree_mut<F>(root: &mut PropSpec, mut visit: F)
where
    F: FnMut(&mut PropSpec),
{
    let mut queue: VecDeque<&mut PropSpec> = VecDeque::new();
    queue.push_back(root);
    while let Some(prop) = queue.pop_front() {
        visit(prop);
        match &mut prop.kind {
            PropKind::String | PropKind::Number | PropKind::Boolean | PropKind::Json => {}
            PropKind::Array { type_prop } | PropKind::Map { type_prop } => {
                queue.push_back(type_prop.as_mut());
            }
            PropKind::Object { entries } => {
                for entry in entries {
                    queue.push_back(entry);
                }
            }
        }
    }
}

/// Flat name sets classifying property lifecycle behavior for one schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlyProperties {
    pub create_only: BTreeSet<String>,
    pub read_only: BTreeSet<String>,
    pub write_only: BTreeSet<String>,
    pub primary_identifier: Vec<String>,
}

impl OnlyProperties {
    /// Build classification sets from vendor path-qualified pointers such
    /// as `/properties/Foo`, reduced to their final segment.
    ///
    /// Known limitation: two differently-nested properties sharing a leaf
    /// name collide; the vendor format does not disambiguate this.
    pub fn from_pointers(
        create_only: &[String],
        read_only: &[String],
        write_only: &[String],
        primary_identifier: &[String],
    ) -> Self {
        Self {
            create_only: create_only.iter().map(|p| leaf_segment(p)).collect(),
            read_only: read_only.iter().map(|p| leaf_segment(p)).collect(),
            write_only: write_only.iter().map(|p| leaf_segment(p)).collect(),
            primary_identifier: primary_identifier.iter().map(|p| leaf_segment(p)).collect(),
        }
    }
}

fn leaf_segment(pointer: &str) -> String {
    pointer
        .rsplit('/')
        .next()
        .unwrap_or(pointer)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(name: &str) -> PropSpec {
        PropSpec::new_scalar(name, PropKind::String, &["root".into(), "domain".into()])
    }

    #[test]
    fn test_only_properties_from_pointers() {
        let only = OnlyProperties::from_pointers(
            &["/properties/Foo".to_string()],
            &["/properties/Nested/Bar".to_string()],
            &[],
            &["/properties/Foo".to_string()],
        );
        assert!(only.create_only.contains("Foo"));
        assert!(only.read_only.contains("Bar"));
        assert!(only.write_only.is_empty());
        assert_eq!(only.primary_identifier, vec!["Foo".to_string()]);
    }

    #[test]
    fn test_bfs_visits_all_nodes_once() {
        let mut root = PropSpec::new_object("domain", &["root".into()]);
        let mut nested = PropSpec::new_object("Config", &root.metadata.prop_path);
        if let PropKind::Object { entries } = &mut nested.kind {
            entries.push(scalar("Inner"));
        }
        let array = PropSpec {
            kind: PropKind::Array {
                type_prop: Box::new(scalar("TagsItem")),
            },
            ..scalar("Tags")
        };
        if let PropKind::Object { entries } = &mut root.kind {
            entries.push(nested);
            entries.push(array);
        }

        let mut seen = Vec::new();
        bfs_prop_tree(&root, |p| seen.push(p.name.clone()));
        assert_eq!(seen, vec!["domain", "Config", "Tags", "Inner", "TagsItem"]);
    }

    #[test]
    fn test_find_descendant() {
        let mut root = PropSpec::new_object("domain", &["root".into()]);
        let mut nested = PropSpec::new_object("Config", &root.metadata.prop_path);
        if let PropKind::Object { entries } = &mut nested.kind {
            entries.push(scalar("Inner"));
        }
        if let PropKind::Object { entries } = &mut root.kind {
            entries.push(nested);
        }
        assert!(root.find_descendant("Config/Inner").is_some());
        assert!(root.find_descendant("Config/Missing").is_none());
    }
}
