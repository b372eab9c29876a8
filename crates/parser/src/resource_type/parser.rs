//! Resource-type definition parser

use super::types::ResourceTypeDoc;
use crate::schema::ResourceIngest;
use asset_spec_generator_common::{Result, SpecError};
use std::fs;
use std::path::Path;

/// Parser for cloud-infrastructure resource-type definitions
///
/// Each document describes exactly one resource type: its property tree,
/// nested definitions, lifecycle classification pointers, and supported
/// handlers.
#[derive(Debug)]
pub struct ResourceTypeParser {
    doc: ResourceTypeDoc,
}

impl ResourceTypeParser {
    /// Load a resource-type definition from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            SpecError::Parse(format!(
                "Failed to read resource-type file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_json(&content)
    }

    /// Parse a resource-type definition from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: ResourceTypeDoc = serde_json::from_str(json).map_err(|e| {
            SpecError::Parse(format!("Failed to parse resource-type JSON: {}", e))
        })?;

        Ok(Self { doc })
    }

    /// Transform the document into the per-resource ingest form: references
    /// inlined, types normalized, domain and resource-value split apart.
    pub fn parse(&self) -> Result<ResourceIngest> {
        super::converter::convert_resource_type(&self.doc)
    }

    pub fn doc(&self) -> &ResourceTypeDoc {
        &self.doc
    }
}
