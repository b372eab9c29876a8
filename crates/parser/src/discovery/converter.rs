//! Discovery document to ingest conversion
//!
//! Discovery documents have no lifecycle pointer lists; classification is
//! derived from the method set instead. A property settable at create time
//! but not at update time is create-only; one the service returns but never
//! accepts is read-only; one it accepts but never returns is write-only.

use super::types::{DiscoveryDoc, DiscoveryMethod, DiscoveryResource};
use crate::dereference::Dereferencer;
use crate::normalize::normalize_tree;
use crate::schema::{OrderedMap, Property, ResourceIngest};
use asset_spec_generator_common::{OnlyProperties, Result, SchemaFamily, SpecError};
use tracing::{debug, warn};

/// Convert one discovery document into ingest forms, one per resource
/// with a create method. A resource that fails conversion is dropped with
/// a logged cause and never voids its siblings.
pub fn convert_discovery(doc: &DiscoveryDoc) -> Result<Vec<ResourceIngest>> {
    let deref = Dereferencer::new(&doc.schemas);
    let mut ingests = Vec::new();

    for (path, resource) in flatten_resources(&doc.resources) {
        if resource.methods.is_empty() {
            continue;
        }
        match convert_resource(doc, &deref, &path, resource) {
            Ok(Some(ingest)) => ingests.push(ingest),
            Ok(None) => {
                debug!(resource = %path.join("."), "no create method, skipping resource")
            }
            Err(e) => {
                warn!(resource = %path.join("."), error = %e, "dropping resource")
            }
        }
    }

    Ok(ingests)
}

/// Depth-first flattening of the nested resource tree, source order kept.
fn flatten_resources(
    resources: &OrderedMap<DiscoveryResource>,
) -> Vec<(Vec<String>, &DiscoveryResource)> {
    let mut flat = Vec::new();
    for (name, resource) in resources.iter() {
        collect(vec![name.clone()], resource, &mut flat);
    }
    flat
}

fn collect<'a>(
    path: Vec<String>,
    resource: &'a DiscoveryResource,
    flat: &mut Vec<(Vec<String>, &'a DiscoveryResource)>,
) {
    flat.push((path.clone(), resource));
    for (name, nested) in resource.resources.iter() {
        let mut nested_path = path.clone();
        nested_path.push(name.clone());
        collect(nested_path, nested, flat);
    }
}

struct MethodSet<'a> {
    create: Option<&'a DiscoveryMethod>,
    read: Option<&'a DiscoveryMethod>,
    update: Option<&'a DiscoveryMethod>,
    delete: Option<&'a DiscoveryMethod>,
}

fn classify_methods(resource: &DiscoveryResource) -> MethodSet<'_> {
    let mut set = MethodSet {
        create: None,
        read: None,
        update: None,
        delete: None,
    };
    for (name, method) in resource.methods.iter() {
        match name.as_str() {
            "insert" | "create" => set.create = Some(method),
            "get" => set.read = Some(method),
            "update" | "patch" => {
                // Prefer update over patch when a resource carries both.
                if set.update.is_none() || name == "update" {
                    set.update = Some(method);
                }
            }
            "delete" => set.delete = Some(method),
            _ => {}
        }
    }
    set
}

fn convert_resource(
    doc: &DiscoveryDoc,
    deref: &Dereferencer,
    path: &[String],
    resource: &DiscoveryResource,
) -> Result<Option<ResourceIngest>> {
    let methods = classify_methods(resource);
    let Some(create) = methods.create else {
        return Ok(None);
    };
    let type_name = type_name(&doc.name, path);

    let create_props = method_body(deref, create, |m| m.request.as_ref())?
        .ok_or_else(|| SpecError::Parse(format!("{}: create method has no request body", create.id)))?;
    let update_props = match methods.update {
        Some(update) => method_body(deref, update, |m| m.request.as_ref())?.unwrap_or_default(),
        None => OrderedMap::new(),
    };
    let get_props = match methods.read {
        Some(get) => method_body(deref, get, |m| m.response.as_ref())?.unwrap_or_default(),
        None => OrderedMap::new(),
    };

    // Writable set in create order, then update-only names.
    let mut domain = OrderedMap::new();
    for (name, prop) in create_props.iter().chain(update_props.iter()) {
        if !domain.contains_key(name) {
            domain.insert(name.clone(), normalize_root(prop, &type_name, name)?);
        }
    }

    let mut resource_value = OrderedMap::new();
    let mut only = OnlyProperties::default();
    for (name, prop) in get_props.iter() {
        if !domain.contains_key(name) {
            only.read_only.insert(name.clone());
            resource_value.insert(name.clone(), normalize_root(prop, &type_name, name)?);
        }
    }
    for name in create_props.keys() {
        if !update_props.contains_key(name) && !update_props.is_empty() {
            only.create_only.insert(name.clone());
        }
    }
    for name in domain.keys() {
        if !get_props.contains_key(name) && !get_props.is_empty() {
            only.write_only.insert(name.clone());
        }
    }
    if get_props.contains_key("id") || create_props.contains_key("id") {
        only.primary_identifier.push("id".to_string());
    }

    let required = create_required(deref, create)?;

    let mut handlers = Vec::new();
    handlers.push("create".to_string());
    if methods.read.is_some() {
        handlers.push("read".to_string());
    }
    if methods.update.is_some() {
        handlers.push("update".to_string());
    }
    if methods.delete.is_some() {
        handlers.push("delete".to_string());
    }

    Ok(Some(ResourceIngest {
        type_name,
        description: create.description.clone().or_else(|| doc.description.clone()),
        doc_link: doc.documentation_link.clone(),
        family: SchemaFamily::Discovery,
        domain,
        resource_value,
        only_properties: only,
        required,
        handlers,
    }))
}

/// Resolve a method's body schema to its root property map. Unknown
/// references at this level are fatal for the resource.
fn method_body(
    deref: &Dereferencer,
    method: &DiscoveryMethod,
    select: impl Fn(&DiscoveryMethod) -> Option<&super::types::SchemaRef>,
) -> Result<Option<OrderedMap<Property>>> {
    let Some(schema_ref) = select(method) else {
        return Ok(None);
    };
    let resolved = deref.resolve_method_ref(&schema_ref.reference, &method.id)?;
    Ok(Some(resolved.properties.unwrap_or_default()))
}

fn create_required(deref: &Dereferencer, create: &DiscoveryMethod) -> Result<Vec<String>> {
    let Some(schema_ref) = &create.request else {
        return Ok(Vec::new());
    };
    let resolved = deref.resolve_method_ref(&schema_ref.reference, &create.id)?;
    Ok(resolved.required.unwrap_or_default())
}

fn normalize_root(prop: &Property, type_name: &str, name: &str) -> Result<Property> {
    normalize_tree(prop, &format!("{type_name}/{name}"))
}

/// `storage` + `["buckets", "accessControls"]` -> `Storage::Buckets::AccessControls`.
fn type_name(service: &str, path: &[String]) -> String {
    let mut segments = vec![capitalize(service)];
    segments.extend(path.iter().map(|s| capitalize(s)));
    segments.join("::")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
