//! Common types and utilities for the Asset Spec Generator
//!
//! This crate contains the vendor-neutral intermediate representation
//! (`PropSpec` trees, sockets, function specs, package specs), the shared
//! error type, and tree-walking helpers used across the parser, generator,
//! and pipeline components.

mod func;
mod package;
mod prop;
mod socket;

pub use func::{
    ActionKind, FuncArgumentKind, FuncArgumentSpec, FuncKind, FuncSpec, ManagementKind,
};
pub use package::{ExistingSpec, PackageSpec, SchemaFamily, SchemaVariantSpec};
pub use prop::{
    bfs_prop_tree, bfs_prop_tree_mut, OnlyProperties, PropKind, PropMetadata, PropSpec,
    PropSpecData, SuggestSource, WidgetKind, WidgetOption,
};
pub use socket::{SocketArity, SocketKind, SocketSpec};

use thiserror::Error;

/// Errors that can occur during spec generation
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown reference '{name}' at {location}")]
    UnknownReference { name: String, location: String },

    #[error("Multi-valued type at {path} is not string plus one concrete member")]
    AmbiguousType { path: String },

    #[error("Union at {path} has unsupported branch shape: {reason}")]
    AmbiguousUnion { path: String, reason: String },

    #[error("String-or-array type at {path} has no items schema")]
    MissingItems { path: String },

    #[error("Union branch at {path} has no title")]
    UntitledBranch { path: String },

    #[error("Map at {path} declares {count} patterns; exactly one is supported")]
    AmbiguousMap { path: String, count: usize },

    #[error("Schema '{0}' produced an empty domain root")]
    EmptyDomain(String),

    #[error("Invalid spec collection: {0}")]
    InvalidCollection(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for spec generation operations
pub type Result<T> = std::result::Result<T, SpecError>;

/// Mint a fresh unique id for a prop or func node.
pub fn new_unique_id() -> String {
    ulid::Ulid::new().to_string()
}
