//! Asset Spec Generator CLI
//!
//! Command-line driver for turning vendor schema documents into
//! vendor-neutral asset specs.

use anyhow::{Context, Result};
use asset_spec_generator_common::ExistingSpec;
use asset_spec_generator_parser::parse_document;
use asset_spec_generator_pipeline::{Pipeline, PublishedSpecs, SchemaLoader};
use clap::{Parser, Subcommand};
use colored::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "asset-spec-generator")]
#[command(version, about = "Generate vendor-neutral asset specs from vendor schema documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one schema document and display the extracted resources
    #[command(after_help = "EXAMPLES:\n  \
        # Parse a resource-type definition\n  \
        asset-spec-generator parse --schema vendor-storage-bucket.json\n\n  \
        # Parse a discovery document\n  \
        asset-spec-generator parse --schema storage-v1.json")]
    Parse {
        /// Path to the schema document
        #[arg(short, long)]
        schema: PathBuf,
    },

    /// Run the full pipeline over a directory of schema documents
    #[command(after_help = "EXAMPLES:\n  \
        # Generate specs for every document in a directory\n  \
        asset-spec-generator generate --schema-dir ./schemas --output ./specs\n\n  \
        # Only storage documents, reusing previously published ids\n  \
        asset-spec-generator generate \\\n    \
        --schema-dir ./schemas \\\n    \
        --filter storage \\\n    \
        --published ./published-specs.json \\\n    \
        --output ./specs")]
    Generate {
        /// Directory containing schema documents
        #[arg(short, long)]
        schema_dir: PathBuf,

        /// Only process documents whose filename contains this pattern
        #[arg(long)]
        filter: Option<String>,

        /// JSON file of previously published specs, for stable-id reuse
        #[arg(long)]
        published: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Parse { schema } => parse_command(schema.as_path(), cli.verbose),
        Commands::Generate {
            schema_dir,
            filter,
            published,
            output,
        } => generate_command(
            schema_dir.as_path(),
            filter.as_deref(),
            published.as_deref(),
            output.as_path(),
        ),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_command(schema_path: &Path, verbose: bool) -> Result<()> {
    println!(
        "{} Parsing schema document: {}",
        "→".cyan(),
        schema_path.display()
    );

    let raw = fs::read_to_string(schema_path)
        .with_context(|| format!("Failed to read {}", schema_path.display()))?;
    let ingests = parse_document(&raw).context("Failed to parse schema document")?;

    println!("\n{}", "✓ Parse successful!".green().bold());
    println!("  Resources: {}", ingests.len());

    for ingest in &ingests {
        println!("\n  • {} ({:?})", ingest.type_name.cyan(), ingest.family);
        println!("    Domain props: {}", ingest.domain.len());
        println!("    Resource-value props: {}", ingest.resource_value.len());
        if !ingest.handlers.is_empty() {
            println!("    Handlers: {}", ingest.handlers.join(", "));
        }
        if verbose {
            for name in ingest.domain.keys() {
                println!("      {}", name);
            }
        }
    }

    Ok(())
}

fn generate_command(
    schema_dir: &Path,
    filter: Option<&str>,
    published: Option<&Path>,
    output: &Path,
) -> Result<()> {
    println!(
        "{} Generating specs from: {}",
        "→".cyan(),
        schema_dir.display()
    );

    let loader = DirectoryLoader {
        dir: schema_dir.to_path_buf(),
    };
    let published = PublishedSpecsFile {
        path: published.map(Path::to_path_buf),
    };

    let result = Pipeline::new(loader, published)
        .run(filter)
        .context("Pipeline run failed")?;

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;

    for spec in &result.specs {
        let file_name = format!("{}.json", file_slug(&spec.name));
        let path = output.join(&file_name);
        let json = serde_json::to_string_pretty(spec).context("Failed to serialize spec")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!(
        "  Documents processed: {}",
        result.summary.documents_processed
    );
    println!("  Specs produced: {}", result.summary.specs_produced);

    if !result.summary.skipped.is_empty() {
        println!(
            "\n{} Skipped {} resource(s):",
            "⚠".yellow(),
            result.summary.skipped.len()
        );
        for skipped in &result.summary.skipped {
            println!("  • {}: {}", skipped.name.yellow(), skipped.reason);
        }
    }

    println!("\n  Specs written to {}", output.display());

    Ok(())
}

/// Loads every `.json` document in one directory, non-recursive, sorted by
/// filename so runs are reproducible.
struct DirectoryLoader {
    dir: PathBuf,
}

impl SchemaLoader for DirectoryLoader {
    fn load_schemas<'a>(
        &self,
        selector: Option<&'a str>,
    ) -> asset_spec_generator_common::Result<Vec<(String, String)>> {
        let mut documents = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(pattern) = selector {
                if !name.contains(pattern) {
                    continue;
                }
            }
            let raw = fs::read_to_string(&path)?;
            documents.push((name.to_string(), raw));
        }
        documents.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(documents)
    }
}

/// Published-spec identities from a JSON file mapping schema name to
/// `{"id": ...}`. No file configured means no ids to reuse.
struct PublishedSpecsFile {
    path: Option<PathBuf>,
}

impl PublishedSpecs for PublishedSpecsFile {
    fn get_existing(
        &self,
    ) -> asset_spec_generator_common::Result<HashMap<String, ExistingSpec>> {
        let Some(path) = &self.path else {
            return Ok(HashMap::new());
        };
        let raw = fs::read_to_string(path)?;
        let existing = serde_json::from_str(&raw)?;
        Ok(existing)
    }
}

/// `Vendor::Storage::Bucket` -> `vendor-storage-bucket`.
fn file_slug(schema_name: &str) -> String {
    schema_name
        .split("::")
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
