//! Resource-type document to ingest conversion

use super::types::ResourceTypeDoc;
use crate::dereference::Dereferencer;
use crate::normalize::normalize_tree;
use crate::schema::{OrderedMap, ResourceIngest};
use asset_spec_generator_common::{OnlyProperties, Result, SchemaFamily};
use tracing::debug;

/// Convert one resource-type document into the ingest form.
///
/// References are inlined against the document's own definitions, every
/// property is normalized to a single concrete type, and the root
/// properties split into the user-settable domain and the vendor-emitted
/// resource value by their read-only classification.
pub fn convert_resource_type(doc: &ResourceTypeDoc) -> Result<ResourceIngest> {
    let deref = Dereferencer::new(&doc.definitions);
    let inlined = deref.inline_properties(&doc.properties)?;

    let mut normalized = OrderedMap::new();
    for (name, prop) in inlined.iter() {
        let path = format!("{}/{}", doc.type_name, name);
        normalized.insert(name.clone(), normalize_tree(prop, &path)?);
    }

    // Conditionally create-only properties fold into the create-only set;
    // the condition itself is not modeled.
    let mut create_only = doc.create_only_properties.clone();
    create_only.extend(doc.conditional_create_only_properties.iter().cloned());

    let only_properties = OnlyProperties::from_pointers(
        &create_only,
        &doc.read_only_properties,
        &doc.write_only_properties,
        &doc.primary_identifier,
    );

    let mut domain = OrderedMap::new();
    let mut resource_value = OrderedMap::new();
    for (name, prop) in normalized.iter() {
        if only_properties.read_only.contains(name) {
            resource_value.insert(name.clone(), prop.clone());
        } else {
            domain.insert(name.clone(), prop.clone());
        }
    }

    debug!(
        type_name = %doc.type_name,
        domain = domain.len(),
        resource_value = resource_value.len(),
        "converted resource-type document"
    );

    Ok(ResourceIngest {
        type_name: doc.type_name.clone(),
        description: doc.description.clone(),
        doc_link: doc.documentation_url.clone().or_else(|| doc.source_url.clone()),
        family: SchemaFamily::ResourceType,
        domain,
        resource_value,
        only_properties,
        required: doc.required.clone(),
        handlers: doc.handlers.keys().cloned().collect(),
    })
}
