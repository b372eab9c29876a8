//! The finished package spec: one schema, one variant, funcs

use crate::{FuncSpec, PropKind, PropSpec, Result, SocketSpec, SpecError};
use serde::{Deserialize, Serialize};

/// Which vendor document family a schema came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaFamily {
    /// Cloud-infrastructure resource-type definitions (classification
    /// lists, handler declarations).
    ResourceType,
    /// API discovery documents (resources with CRUD methods).
    Discovery,
}

/// One variant of a schema: the domain tree (user-settable), the
/// resource-value tree (vendor-emitted), secrets, and derived sockets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaVariantSpec {
    pub unique_id: String,
    pub domain: PropSpec,
    pub resource_value: PropSpec,
    pub secrets: PropSpec,
    pub sockets: Vec<SocketSpec>,
}

impl SchemaVariantSpec {
    /// A variant is structurally valid only if its domain root is an
    /// object node. Anything else is an upstream contract violation.
    pub fn check_domain_root(&self, schema_name: &str) -> Result<()> {
        match self.domain.kind {
            PropKind::Object { .. } => Ok(()),
            _ => Err(SpecError::InvalidCollection(format!(
                "variant for '{}' has no domain object root",
                schema_name
            ))),
        }
    }
}

/// The final unit produced by the pipeline. Immutable once built;
/// persistence is an external collaborator's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSpec {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub family: SchemaFamily,
    /// Stable schema id, reconciled against previously published specs.
    pub schema_unique_id: String,
    pub schemas: Vec<SchemaVariantSpec>,
    pub funcs: Vec<FuncSpec>,
}

impl PackageSpec {
    /// The single variant every pipeline-produced package carries.
    pub fn variant(&self) -> &SchemaVariantSpec {
        &self.schemas[0]
    }

    pub fn variant_mut(&mut self) -> &mut SchemaVariantSpec {
        &mut self.schemas[0]
    }
}

/// Identity of a previously published spec, consumed only by the
/// identifier-reconciliation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingSpec {
    pub id: String,
}
