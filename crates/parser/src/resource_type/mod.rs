//! Cloud-infrastructure resource-type definition parser
//!
//! Parses vendor resource-type definitions into the per-resource ingest
//! form consumed by the IR builder.
//!
//! ## Document Format
//!
//! One JSON document per resource type: JSON Schema draft-07 plus vendor
//! extensions. The extensions that matter here are the lifecycle pointer
//! lists (`createOnlyProperties`, `readOnlyProperties`,
//! `writeOnlyProperties`, `conditionalCreateOnlyProperties`,
//! `primaryIdentifier`) and the `handlers` declaration.
//!
//! ## Usage
//! ```rust,ignore
//! use asset_spec_generator_parser::resource_type::ResourceTypeParser;
//!
//! let parser = ResourceTypeParser::from_file("vendor-storage-bucket.json")?;
//! let ingest = parser.parse()?;
//! ```

mod converter;
mod parser;
mod types;

pub use parser::ResourceTypeParser;
pub use types::*;
