//! API discovery document structures

use crate::schema::{OrderedMap, Property};
use serde::{Deserialize, Serialize};

/// One API discovery document.
///
/// Describes a whole service: a shared schema map plus a resource tree
/// whose methods reference those schemas by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryDoc {
    /// Service name, e.g. `storage`.
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub documentation_link: Option<String>,

    /// Named schema definitions methods reference via `$ref`.
    #[serde(default)]
    pub schemas: OrderedMap<Property>,

    #[serde(default)]
    pub resources: OrderedMap<DiscoveryResource>,
}

/// One resource in the discovery tree. Resources nest arbitrarily; methods
/// hang off any level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResource {
    #[serde(default)]
    pub methods: OrderedMap<DiscoveryMethod>,

    #[serde(default)]
    pub resources: OrderedMap<DiscoveryResource>,
}

/// One method on a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryMethod {
    /// Dotted method id, e.g. `storage.buckets.insert`.
    pub id: String,

    #[serde(default)]
    pub http_method: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub request: Option<SchemaRef>,

    #[serde(default)]
    pub response: Option<SchemaRef>,
}

/// A by-name reference to an entry in the document's schema map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaRef {
    #[serde(rename = "$ref")]
    pub reference: String,
}
