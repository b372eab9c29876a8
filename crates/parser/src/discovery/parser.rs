//! Discovery document parser

use super::types::DiscoveryDoc;
use crate::schema::ResourceIngest;
use asset_spec_generator_common::{Result, SpecError};
use std::fs;
use std::path::Path;

/// Parser for API discovery documents
///
/// One document describes a whole service; parsing yields one ingest per
/// resource that exposes enough methods to be manageable.
#[derive(Debug)]
pub struct DiscoveryParser {
    doc: DiscoveryDoc,
}

impl DiscoveryParser {
    /// Load a discovery document from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            SpecError::Parse(format!(
                "Failed to read discovery file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_json(&content)
    }

    /// Parse a discovery document from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: DiscoveryDoc = serde_json::from_str(json)
            .map_err(|e| SpecError::Parse(format!("Failed to parse discovery JSON: {}", e)))?;

        Ok(Self { doc })
    }

    /// Transform the document into ingest forms, one per eligible resource.
    ///
    /// A resource whose method-level references cannot be resolved is
    /// dropped with a logged cause; the other resources still parse.
    pub fn parse(&self) -> Result<Vec<ResourceIngest>> {
        super::converter::convert_discovery(&self.doc)
    }

    pub fn doc(&self) -> &DiscoveryDoc {
        &self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_minimal() {
        let parser = DiscoveryParser::from_json(
            r#"{"name": "storage", "version": "v1", "schemas": {}, "resources": {}}"#,
        )
        .unwrap();
        assert_eq!(parser.doc().name, "storage");
    }

    #[test]
    fn test_from_json_invalid() {
        let err = DiscoveryParser::from_json("not json").unwrap_err();
        assert!(matches!(err, SpecError::Parse(_)));
    }
}
