//! Schema document parsing for vendor resource definitions
//!
//! This crate turns vendor-published schema documents into the
//! vendor-neutral property tree (`PropSpec`) the rest of the pipeline
//! consumes.
//!
//! ## Parsing Strategy
//!
//! Two document families are supported:
//! - **Resource-type definitions**: one JSON Schema draft-07 variant per
//!   resource, with lifecycle pointer lists and a handler declaration.
//! - **Discovery documents**: one document per service, with a shared
//!   schema map and a nested resource/method tree; lifecycle
//!   classification is derived from the method set.
//!
//! Both funnel through the same stages: reference dereferencing with
//! cycle handling, type normalization to a single concrete tag per
//! property, and breadth-first IR-tree construction.

pub mod build;
pub mod dereference;
pub mod discovery;
pub mod normalize;
pub mod resource_type;
pub mod schema;

pub use build::{build_prop_tree, build_variant};
pub use dereference::Dereferencer;
pub use discovery::DiscoveryParser;
pub use normalize::normalize_tree;
pub use resource_type::ResourceTypeParser;
pub use schema::{OrderedMap, Property, ResourceIngest, SchemaType, TypeField};

use asset_spec_generator_common::{Result, SpecError};

/// Parse one raw document, detecting its family from its shape.
///
/// A `typeName` field marks a resource-type definition (one ingest); a
/// `schemas`/`resources` pair marks a discovery document (one ingest per
/// eligible resource).
pub fn parse_document(json: &str) -> Result<Vec<ResourceIngest>> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| SpecError::Parse(format!("Failed to parse document JSON: {}", e)))?;

    if value.get("typeName").is_some() {
        let parser = ResourceTypeParser::from_json(json)?;
        return Ok(vec![parser.parse()?]);
    }
    if value.get("resources").is_some() || value.get("discoveryVersion").is_some() {
        let parser = DiscoveryParser::from_json(json)?;
        return parser.parse();
    }

    Err(SpecError::Parse(
        "document matches no supported schema family".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_resource_type_family() {
        let ingests = parse_document(
            r#"{
                "typeName": "Vendor::Storage::Bucket",
                "properties": {"BucketName": {"type": "string"}}
            }"#,
        )
        .unwrap();
        assert_eq!(ingests.len(), 1);
        assert_eq!(ingests[0].type_name, "Vendor::Storage::Bucket");
    }

    #[test]
    fn test_detects_discovery_family() {
        let ingests = parse_document(
            r#"{
                "name": "compute",
                "discoveryVersion": "v1",
                "schemas": {
                    "Disk": {"type": "object", "properties": {"name": {"type": "string"}}}
                },
                "resources": {
                    "disks": {
                        "methods": {
                            "insert": {"id": "compute.disks.insert", "request": {"$ref": "Disk"}}
                        }
                    }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(ingests.len(), 1);
        assert_eq!(ingests[0].type_name, "Compute::Disks");
    }

    #[test]
    fn test_unrecognized_document_is_parse_error() {
        let err = parse_document(r#"{"something": "else"}"#).unwrap_err();
        assert!(matches!(err, SpecError::Parse(_)));
    }
}
