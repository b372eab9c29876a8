//! Resource-type definition document structures

use crate::schema::{OrderedMap, Property};
use serde::{Deserialize, Serialize};

/// One vendor resource-type definition document.
///
/// A JSON Schema draft-07 variant with vendor extensions: pointer lists
/// classifying property lifecycle behavior and a handler declaration naming
/// the operations the vendor supports for the type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeDoc {
    /// Fully-qualified type name, e.g. `Vendor::S3::Bucket`.
    pub type_name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Link to vendor documentation for the type.
    #[serde(default)]
    pub source_url: Option<String>,

    #[serde(default)]
    pub documentation_url: Option<String>,

    #[serde(default)]
    pub properties: OrderedMap<Property>,

    #[serde(default)]
    pub definitions: OrderedMap<Property>,

    /// JSON pointers (`/properties/Name`) into the property tree.
    #[serde(default)]
    pub create_only_properties: Vec<String>,

    /// Pointers that become create-only depending on sibling values. Folded
    /// into the create-only set; the conditionality itself is not modeled.
    #[serde(default)]
    pub conditional_create_only_properties: Vec<String>,

    #[serde(default)]
    pub read_only_properties: Vec<String>,

    #[serde(default)]
    pub write_only_properties: Vec<String>,

    #[serde(default)]
    pub primary_identifier: Vec<String>,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(default)]
    pub handlers: OrderedMap<HandlerDecl>,
}

/// One declared handler. Permissions are carried for completeness; only the
/// handler's presence matters downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerDecl {
    #[serde(default)]
    pub permissions: Vec<String>,

    #[serde(default)]
    pub timeout_in_minutes: Option<u32>,
}
