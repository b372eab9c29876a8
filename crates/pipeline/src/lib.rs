//! Pipeline orchestration
//!
//! Sequences the full transformation for a run: load raw documents, parse
//! them into ingest forms, build prop trees and sockets, then run the
//! ordered stage sequence (default props, default funcs, intrinsics,
//! overrides, reordering, asset funcs, identifier reconciliation) over the
//! whole collection.
//!
//! Failure isolation follows three tiers: a malformed property is omitted
//! from its resource, a fatally malformed resource is dropped from the run
//! with a logged reason, and a structurally invalid collection aborts the
//! run outright.

mod overrides;
mod steps;

pub use overrides::{Override, OverrideAction, OverrideSet};

use asset_spec_generator_common::{bfs_prop_tree, ExistingSpec, PackageSpec, Result, SpecError};
use asset_spec_generator_generator::derive_sockets;
use asset_spec_generator_parser::{build_variant, parse_document, ResourceIngest};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Supplies name-to-raw-document pairs for a run. Implementations must not
/// mutate their backing set across calls within one run.
#[cfg_attr(test, mockall::automock)]
pub trait SchemaLoader {
    fn load_schemas<'a>(&self, selector: Option<&'a str>) -> Result<Vec<(String, String)>>;
}

/// Previously published spec identities, consumed only by identifier
/// reconciliation.
#[cfg_attr(test, mockall::automock)]
pub trait PublishedSpecs {
    fn get_existing(&self) -> Result<HashMap<String, ExistingSpec>>;
}

/// One package plus per-resource context the stages still need.
pub(crate) struct InFlightSpec {
    pub package: PackageSpec,
    pub handlers: Vec<String>,
}

/// A resource dropped during a run, with its logged reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedResource {
    pub name: String,
    pub reason: String,
}

/// Counts and skip reasons for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub documents_processed: usize,
    pub specs_produced: usize,
    pub skipped: Vec<SkippedResource>,
}

/// Everything one run produces.
pub struct PipelineOutput {
    pub specs: Vec<PackageSpec>,
    pub summary: RunSummary,
}

/// The orchestrator. Holds the run's collaborators; all per-run state is
/// built inside `run` and threaded through the stages as arguments.
pub struct Pipeline<L, P> {
    loader: L,
    published: P,
    overrides: OverrideSet,
}

impl<L: SchemaLoader, P: PublishedSpecs> Pipeline<L, P> {
    pub fn new(loader: L, published: P) -> Self {
        Self {
            loader,
            published,
            overrides: OverrideSet::builtin(),
        }
    }

    pub fn with_overrides(mut self, overrides: OverrideSet) -> Self {
        self.overrides = overrides;
        self
    }

    /// Run the full pipeline over every document the loader yields.
    pub fn run(&self, selector: Option<&str>) -> Result<PipelineOutput> {
        let documents = self.loader.load_schemas(selector)?;
        let mut summary = RunSummary::default();
        let mut in_flight = Vec::new();

        for (doc_name, raw) in &documents {
            summary.documents_processed += 1;
            let ingests = match parse_document(raw) {
                Ok(ingests) => ingests,
                Err(e) => {
                    warn!(document = %doc_name, error = %e, "dropping document");
                    summary.skipped.push(SkippedResource {
                        name: doc_name.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            for ingest in ingests {
                let name = ingest.type_name.clone();
                match assemble(&ingest) {
                    Ok(spec) => in_flight.push(spec),
                    Err(e @ SpecError::InvalidCollection(_)) => return Err(e),
                    Err(e) => {
                        warn!(resource = %name, error = %e, "dropping resource");
                        summary.skipped.push(SkippedResource {
                            name,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        let existing = self.published.get_existing()?;
        let specs = steps::run_stages(in_flight, &self.overrides, &existing)?;

        summary.specs_produced = specs.len();
        info!(
            documents = summary.documents_processed,
            specs = summary.specs_produced,
            skipped = summary.skipped.len(),
            "pipeline run complete"
        );

        Ok(PipelineOutput { specs, summary })
    }
}

/// Build one in-flight package from an ingest: prop trees, sockets, and
/// the package shell. Funcs are attached by the stages.
fn assemble(ingest: &ResourceIngest) -> Result<InFlightSpec> {
    let mut variant = build_variant(ingest)?;

    let mut sockets = derive_sockets(&variant.domain);
    sockets.extend(derive_sockets(&variant.resource_value));
    variant.sockets = sockets;

    let mut prop_count = 0usize;
    bfs_prop_tree(&variant.domain, |_| prop_count += 1);
    debug!(
        resource = %ingest.type_name,
        props = prop_count,
        sockets = variant.sockets.len(),
        "assembled variant"
    );

    let package = PackageSpec {
        name: ingest.type_name.clone(),
        // Specs version by generation date; stable ids, not versions, carry
        // identity across runs.
        version: chrono::Utc::now().format("%Y.%m.%d").to_string(),
        description: ingest.description.clone(),
        category: Some(category_of(&ingest.type_name)),
        family: ingest.family,
        schema_unique_id: variant.unique_id.clone(),
        schemas: vec![variant],
        funcs: Vec::new(),
    };

    Ok(InFlightSpec {
        package,
        handlers: ingest.handlers.clone(),
    })
}

/// `Vendor::Storage::Bucket` -> `Storage`; `Storage::Buckets` -> `Storage`.
fn category_of(type_name: &str) -> String {
    let segments: Vec<&str> = type_name.split("::").collect();
    match segments.as_slice() {
        [_, service, _, ..] => (*service).to_string(),
        [first, ..] => (*first).to_string(),
        [] => String::new(),
    }
}
