//! API discovery document parser
//!
//! Parses service discovery documents into per-resource ingest forms.
//!
//! ## Document Format
//!
//! One JSON document per service: a shared `schemas` map plus a nested
//! `resources` tree whose methods reference schemas by name. There are no
//! lifecycle pointer lists; classification is derived from the method set
//! (see the converter module).
//!
//! ## Usage
//! ```rust,ignore
//! use asset_spec_generator_parser::discovery::DiscoveryParser;
//!
//! let parser = DiscoveryParser::from_file("storage-v1.json")?;
//! let ingests = parser.parse()?;
//! ```

mod converter;
mod parser;
mod types;

pub use parser::DiscoveryParser;
pub use types::*;
