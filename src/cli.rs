//! Command-line interface implementation

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::catalog::CatalogError;
use crate::check::preflight;
use crate::config::{parse_layer_order, GenerationConfig};
use crate::generator::{generate, GenerateError};
use crate::source::{CatalogSource, DirectorySource, TraitSource};

/// Exit codes
const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// Traitforge - generate layered edition images and ERC-721 metadata
#[derive(Parser)]
#[command(name = "traitforge")]
#[command(about = "Traitforge - generate layered edition images and ERC-721 metadata")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a batch of unique editions (images, metadata, manifest)
    Generate {
        /// Path to the traits catalog CSV
        #[arg(long, default_value = "traits_catalog.csv", conflicts_with = "trait_dirs")]
        csv: PathBuf,

        /// Scan per-layer trait directories under this root instead of a CSV
        #[arg(long)]
        trait_dirs: Option<PathBuf>,

        /// Output directory
        #[arg(long, default_value = "output")]
        outdir: PathBuf,

        /// Number of editions to mint
        #[arg(long, default_value_t = 10)]
        supply: u32,

        /// Token name prefix
        #[arg(long, default_value = "Edition #")]
        name_prefix: String,

        /// Metadata description
        #[arg(long, default_value = "")]
        description: String,

        /// Base URI for the metadata directory (contract baseURI)
        #[arg(long, default_value = "ipfs://METADATA_CID/")]
        base_uri: String,

        /// Optional base URI specifically for images (e.g. ipfs://IMAGES_CID/)
        #[arg(long)]
        images_suburi: Option<String>,

        /// Optional external_url carried into every metadata document
        #[arg(long)]
        external_url: Option<String>,

        /// Comma-separated bottom-to-top layer order (default: catalog order)
        #[arg(long)]
        layer_order: Option<String>,

        /// PRNG seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Max attempts to find unique combos
        #[arg(long, default_value_t = 100_000)]
        max_retries: u32,

        /// Force output image width (requires --image-height)
        #[arg(long, requires = "image_height")]
        image_width: Option<u32>,

        /// Force output image height (requires --image-width)
        #[arg(long, requires = "image_width")]
        image_height: Option<u32>,
    },

    /// Preflight a trait source without generating anything
    Check {
        /// Path to the traits catalog CSV
        #[arg(long, default_value = "traits_catalog.csv", conflicts_with = "trait_dirs")]
        csv: PathBuf,

        /// Scan per-layer trait directories under this root instead of a CSV
        #[arg(long)]
        trait_dirs: Option<PathBuf>,

        /// Comma-separated layer order to validate (default: catalog order)
        #[arg(long)]
        layer_order: Option<String>,

        /// Intended supply, to verify the combination space covers it
        #[arg(long)]
        supply: Option<u32>,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            csv,
            trait_dirs,
            outdir,
            supply,
            name_prefix,
            description,
            base_uri,
            images_suburi,
            external_url,
            layer_order,
            seed,
            max_retries,
            image_width,
            image_height,
        } => {
            let config = GenerationConfig {
                outdir,
                supply,
                name_prefix,
                description,
                base_uri,
                images_base_uri: images_suburi,
                external_url,
                layer_order: parse_layer_order(layer_order.as_deref()),
                seed,
                max_retries,
                forced_size: match (image_width, image_height) {
                    (Some(width), Some(height)) => Some((width, height)),
                    _ => None,
                },
            };
            run_generate(&config, &csv, trait_dirs.as_deref())
        }
        Commands::Check {
            csv,
            trait_dirs,
            layer_order,
            supply,
        } => run_check(
            &csv,
            trait_dirs.as_deref(),
            layer_order.as_deref(),
            supply,
        ),
    }
}

fn make_source(csv: &Path, trait_dirs: Option<&Path>) -> Box<dyn TraitSource> {
    match trait_dirs {
        Some(root) => Box::new(DirectorySource::new(root)),
        None => Box::new(CatalogSource::new(csv)),
    }
}

/// Execute the generate command
fn run_generate(config: &GenerationConfig, csv: &Path, trait_dirs: Option<&Path>) -> ExitCode {
    let source = make_source(csv, trait_dirs);

    match generate(config, source.as_ref()) {
        Ok(report) => {
            println!(
                "Done. Generated {} editions into {} (attempts={})",
                report.created,
                config.outdir.display(),
                report.attempts
            );
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            let code = match &err {
                GenerateError::Catalog(CatalogError::NotFound(_)) => EXIT_INVALID_ARGS,
                _ => EXIT_ERROR,
            };
            ExitCode::from(code)
        }
    }
}

/// Execute the check command
fn run_check(
    csv: &Path,
    trait_dirs: Option<&Path>,
    layer_order: Option<&str>,
    supply: Option<u32>,
) -> ExitCode {
    let source = make_source(csv, trait_dirs);

    let tables = match source.layer_tables() {
        Ok(tables) => tables,
        Err(err) => {
            eprintln!("Error: {}", err);
            let code = match err {
                CatalogError::NotFound(_) => EXIT_INVALID_ARGS,
                _ => EXIT_ERROR,
            };
            return ExitCode::from(code);
        }
    };

    let order: Vec<String> = {
        let parsed = parse_layer_order(layer_order);
        if parsed.is_empty() {
            tables.keys().cloned().collect()
        } else {
            parsed
        }
    };
    if order.is_empty() {
        eprintln!("Error: no layers found to check");
        return ExitCode::from(EXIT_ERROR);
    }

    let report = preflight(&tables, &order, supply);

    for layer in &report.layers {
        println!(
            "Layer '{}': {} options, {} remote, {} missing",
            layer.layer,
            layer.options,
            layer.remote,
            layer.missing.len()
        );
        for locator in &layer.missing {
            println!("  missing: {}", locator);
        }
    }
    println!("Total combinations: {}", report.total_combinations);
    if let Some(supply) = supply {
        println!("Requested supply: {}", supply);
    }

    if report.passed() {
        println!("Preflight passed.");
        ExitCode::from(EXIT_SUCCESS)
    } else {
        eprintln!("Error: preflight failed");
        ExitCode::from(EXIT_ERROR)
    }
}
