//! IR-tree construction
//!
//! Walks normalized schema shapes into a `PropSpec` tree. Traversal is
//! breadth-first over an explicit worklist rather than the call stack, so
//! arbitrarily deep vendor schemas cannot overflow; parent/child wiring
//! happens in a separate reverse-index assembly pass.

use crate::schema::{AdditionalProperties, Property, ResourceIngest, SchemaType};
use asset_spec_generator_common::{
    new_unique_id, OnlyProperties, PropKind, PropMetadata, PropSpec, PropSpecData, Result,
    SchemaVariantSpec, SpecError, WidgetKind, WidgetOption,
};
use std::collections::VecDeque;
use tracing::warn;

/// Widget option label marking create-time-only props for the front end.
pub const CREATE_ONLY_PROP_LABEL: &str = "create_only_prop";

/// Build the full schema variant for one ingested resource: domain,
/// resource-value, and secrets trees.
pub fn build_variant(ingest: &ResourceIngest) -> Result<SchemaVariantSpec> {
    let domain = build_prop_tree(
        "domain",
        ingest.domain.iter(),
        &ingest.only_properties,
        &ingest.required,
    )?;
    if domain.entries().is_empty() {
        return Err(SpecError::EmptyDomain(ingest.type_name.clone()));
    }

    let resource_value = build_prop_tree(
        "resource_value",
        ingest.resource_value.iter(),
        &ingest.only_properties,
        &[],
    )?;
    let secrets = build_prop_tree("secrets", std::iter::empty(), &ingest.only_properties, &[])?;

    Ok(SchemaVariantSpec {
        unique_id: new_unique_id(),
        domain,
        resource_value,
        secrets,
        sockets: Vec::new(),
    })
}

/// How a finished node attaches to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attach {
    /// Named entry of an object node.
    Entry,
    /// The single element type of an array or map node.
    ElementType,
}

/// One pending unit of tree construction.
struct WorkItem {
    shape: Property,
    name: String,
    path: Vec<String>,
    required: bool,
    parent: Option<(usize, Attach)>,
}

/// A created-but-unwired node in the arena.
struct NodeSlot {
    spec: PropSpec,
    /// Object children in enqueue order.
    children: Vec<usize>,
    /// Element-type child of an array/map node.
    element: Option<usize>,
}

/// Build one `PropSpec` tree rooted at an object named `root_name`.
///
/// Unbuildable properties are logged with their path and omitted; their
/// siblings and the rest of the resource continue. Partial success is
/// preferred over all-or-nothing.
pub fn build_prop_tree<'a>(
    root_name: &str,
    properties: impl Iterator<Item = (&'a String, &'a Property)>,
    only: &OnlyProperties,
    required: &[String],
) -> Result<PropSpec> {
    let mut nodes: Vec<NodeSlot> = Vec::new();
    let mut queue: VecDeque<WorkItem> = VecDeque::new();

    nodes.push(NodeSlot {
        spec: PropSpec::new_object(root_name, &["root".to_string()]),
        children: Vec::new(),
        element: None,
    });
    let root_path = nodes[0].spec.metadata.prop_path.clone();

    for (name, shape) in properties {
        let mut path = root_path.clone();
        path.push(name.clone());
        queue.push_back(WorkItem {
            shape: shape.clone(),
            name: name.clone(),
            path,
            required: required.contains(name),
            parent: Some((0, Attach::Entry)),
        });
    }

    while let Some(item) = queue.pop_front() {
        let Some(kind) = node_kind(&item)? else {
            warn!(path = %item.path.join("/"), "unrecoverable property shape, omitting");
            continue;
        };

        let index = nodes.len();
        let spec = make_spec(&item, kind, only);

        // Enqueue children before the parent link is recorded so sibling
        // order in the queue matches source order.
        match spec.kind {
            PropKind::Array { .. } | PropKind::Map { .. } => {
                // A missing element shape leaves the slot empty; the
                // assembly pass then omits the whole collection.
                let element_shape = match spec.kind {
                    PropKind::Array { .. } => item.shape.items.as_deref(),
                    _ => map_value_shape(&item.shape),
                };
                if let Some(shape) = element_shape {
                    let child_name = format!("{}Item", item.name);
                    let mut child_path = item.path.clone();
                    child_path.push(child_name.clone());
                    queue.push_back(WorkItem {
                        shape: shape.clone(),
                        name: child_name,
                        path: child_path,
                        required: false,
                        parent: Some((index, Attach::ElementType)),
                    });
                }
            }
            PropKind::Object { .. } => {
                if let Some(children) = &item.shape.properties {
                    let child_required = item.shape.required.clone().unwrap_or_default();
                    for (child_name, child_shape) in children.iter() {
                        let mut child_path = item.path.clone();
                        child_path.push(child_name.clone());
                        queue.push_back(WorkItem {
                            shape: child_shape.clone(),
                            name: child_name.clone(),
                            path: child_path,
                            required: child_required.contains(child_name),
                            parent: Some((index, Attach::Entry)),
                        });
                    }
                }
            }
            _ => {}
        }

        if let Some((parent, attach)) = item.parent {
            match attach {
                Attach::Entry => nodes[parent].children.push(index),
                Attach::ElementType => nodes[parent].element = Some(index),
            }
        }

        nodes.push(NodeSlot {
            spec,
            children: Vec::new(),
            element: None,
        });
    }

    Ok(assemble(nodes))
}

/// Wire finished children into their parents. Children always sit at
/// higher arena indices than their parents, so one reverse pass completes
/// every node before its parent needs it.
fn assemble(nodes: Vec<NodeSlot>) -> PropSpec {
    let count = nodes.len();
    let mut slots: Vec<Option<NodeSlot>> = nodes.into_iter().map(Some).collect();
    let mut built: Vec<Option<PropSpec>> = (0..count).map(|_| None).collect();

    for index in (0..count).rev() {
        let slot = slots[index].take().expect("each slot is taken once");
        let mut spec = slot.spec;

        match &mut spec.kind {
            PropKind::Object { entries } => {
                for child in &slot.children {
                    if let Some(child_spec) = built[*child].take() {
                        entries.push(child_spec);
                    }
                }
            }
            PropKind::Array { type_prop } | PropKind::Map { type_prop } => {
                match slot.element.and_then(|e| built[e].take()) {
                    Some(element) => *type_prop = Box::new(element),
                    None => {
                        // The element type was unbuildable, which makes the
                        // collection itself unbuildable.
                        warn!(
                            path = %spec.metadata.prop_path.join("/"),
                            "collection lost its element type, omitting"
                        );
                        continue;
                    }
                }
            }
            _ => {}
        }

        built[index] = Some(spec);
    }

    built[0].take().expect("root slot always assembles")
}

/// Decide the IR kind for one normalized shape, or `None` when the shape
/// is unrecoverable.
fn node_kind(item: &WorkItem) -> Result<Option<PropKind>> {
    let placeholder = || Box::new(PropSpec::new_object("placeholder", &[]));

    match item.shape.single_type() {
        Some(SchemaType::String) => Ok(Some(PropKind::String)),
        Some(SchemaType::Integer) | Some(SchemaType::Number) => Ok(Some(PropKind::Number)),
        Some(SchemaType::Boolean) => Ok(Some(PropKind::Boolean)),
        Some(SchemaType::Json) => Ok(Some(PropKind::Json)),
        Some(SchemaType::Array) => {
            if item.shape.items.is_none() {
                return Ok(None);
            }
            Ok(Some(PropKind::Array {
                type_prop: placeholder(),
            }))
        }
        Some(SchemaType::Object) => {
            if let Some(patterns) = &item.shape.pattern_properties {
                return match patterns.len() {
                    0 => Ok(object_or_opaque(item)),
                    1 => Ok(Some(PropKind::Map {
                        type_prop: placeholder(),
                    })),
                    count => Err(SpecError::AmbiguousMap {
                        path: item.path.join("/"),
                        count,
                    }),
                };
            }
            if let Some(AdditionalProperties::Schema(_)) = &item.shape.additional_properties {
                return Ok(Some(PropKind::Map {
                    type_prop: placeholder(),
                }));
            }
            Ok(object_or_opaque(item))
        }
        Some(SchemaType::Null) | None => Ok(None),
    }
}

/// An object with named properties builds as an object node; one without
/// any shape at all (including cycle sentinels) degrades to an opaque
/// string leaf so the rest of the tree keeps its place.
fn object_or_opaque(item: &WorkItem) -> Option<PropKind> {
    if item.shape.properties.is_some() {
        Some(PropKind::Object {
            entries: Vec::new(),
        })
    } else {
        Some(PropKind::String)
    }
}

fn make_spec(item: &WorkItem, kind: PropKind, only: &OnlyProperties) -> PropSpec {
    let mut data = PropSpecData {
        widget_kind: Some(widget_for(&kind, &item.shape)),
        documentation: item.shape.description.clone(),
        ..Default::default()
    };

    if let (true, Some(values)) = (kind.is_scalar(), &item.shape.enum_values) {
        for value in values {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            data.widget_options.push(WidgetOption {
                label: text.clone(),
                value: text,
            });
        }
    }

    let metadata = PropMetadata {
        create_only: only.create_only.contains(&item.name),
        read_only: only.read_only.contains(&item.name),
        write_only: only.write_only.contains(&item.name),
        primary_identifier: only.primary_identifier.contains(&item.name),
        prop_path: item.path.clone(),
        required: item.required,
    };

    if metadata.create_only {
        data.widget_options.push(WidgetOption {
            label: CREATE_ONLY_PROP_LABEL.to_string(),
            value: "true".to_string(),
        });
    }

    PropSpec {
        name: item.name.clone(),
        unique_id: new_unique_id(),
        data,
        metadata,
        kind,
    }
}

fn widget_for(kind: &PropKind, shape: &Property) -> WidgetKind {
    match kind {
        PropKind::String | PropKind::Number => {
            if shape.enum_values.is_some() {
                WidgetKind::ComboBox
            } else {
                WidgetKind::Text
            }
        }
        PropKind::Boolean => WidgetKind::Checkbox,
        PropKind::Json => WidgetKind::CodeEditor,
        PropKind::Array { .. } => WidgetKind::Array,
        PropKind::Map { .. } => WidgetKind::Map,
        PropKind::Object { .. } => WidgetKind::Header,
    }
}

fn map_value_shape(shape: &Property) -> Option<&Property> {
    if let Some(patterns) = &shape.pattern_properties {
        if let Some((_, value)) = patterns.iter().next() {
            return Some(value);
        }
    }
    if let Some(AdditionalProperties::Schema(value)) = &shape.additional_properties {
        return Some(value);
    }
    None
}
