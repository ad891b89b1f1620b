//! Generation controller - the draw/check/compose/emit loop
//!
//! Drives one run: sample a trait per layer, reject duplicate
//! combinations by signature, composite and persist accepted editions,
//! all under a bounded retry budget. Given a fixed seed, catalog and
//! configuration the full edition sequence is reproducible.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::compositor::{AssetError, Compositor};
use crate::config::GenerationConfig;
use crate::manifest::ManifestWriter;
use crate::metadata::build_metadata;
use crate::models::{ChosenTrait, ChosenTraits, Edition};
use crate::output::{save_png, write_json, write_readme, OutputError, OutputLayout};
use crate::sampler::{choose_trait, make_rng};
use crate::signature::{combo_signature, SignatureSet};
use crate::source::TraitSource;

/// Error type for a generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// Layers named in the order have no trait options
    #[error("no traits found for layers: {}", .0.join(", "))]
    LayerConfiguration(Vec<String>),
    /// The effective layer order is empty
    #[error("layer order is empty; nothing to generate")]
    EmptyLayerOrder,
    #[error(transparent)]
    Asset(#[from] AssetError),
    /// Retry budget ran out before reaching the target supply.
    /// Already-emitted editions are kept on disk, not rolled back.
    #[error(
        "could only create {created}/{supply} unique editions after {attempts} attempts; \
         add more traits or layers, or increase the retry budget"
    )]
    ExhaustedRetryBudget {
        created: u32,
        attempts: u32,
        supply: u32,
    },
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("manifest error: {0}")]
    Manifest(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    /// Editions written to disk
    pub created: u32,
    /// Total draws, accepted and rejected
    pub attempts: u32,
}

/// Run one full generation.
///
/// Pulls layer tables from `source` once, validates the layer order,
/// then loops: draw one trait per layer, compute the combination
/// signature, skip duplicates, and for each accepted combination
/// assign the next sequential token id, composite the image and emit
/// metadata plus a manifest row. Stops at the target supply or when
/// the retry budget is exhausted.
pub fn generate(
    config: &GenerationConfig,
    source: &dyn TraitSource,
) -> Result<GenerationReport, GenerateError> {
    let tables = source.layer_tables()?;

    // Empty override means the source's first-seen layer order
    let layer_order: Vec<String> = if config.layer_order.is_empty() {
        tables.keys().cloned().collect()
    } else {
        config.layer_order.clone()
    };
    if layer_order.is_empty() {
        return Err(GenerateError::EmptyLayerOrder);
    }

    let unpopulated: Vec<String> = layer_order
        .iter()
        .filter(|layer| tables.get(*layer).map_or(true, |options| options.is_empty()))
        .cloned()
        .collect();
    if !unpopulated.is_empty() {
        return Err(GenerateError::LayerConfiguration(unpopulated));
    }

    let layout = OutputLayout::new(&config.outdir);
    layout.prepare()?;

    let mut compositor = Compositor::new(config.forced_size)?;
    let mut manifest = ManifestWriter::create(&layout.manifest_path(), &layer_order)?;
    let mut rng = make_rng(config.seed);
    let mut used = SignatureSet::new();

    let mut created: u32 = 0;
    let mut attempts: u32 = 0;

    while created < config.supply && attempts < config.max_retries {
        attempts += 1;

        let mut chosen = ChosenTraits::with_capacity(layer_order.len());
        for layer in &layer_order {
            let options = tables
                .get(layer)
                .ok_or_else(|| GenerateError::LayerConfiguration(vec![layer.clone()]))?;
            let option = choose_trait(options, &mut rng)
                .ok_or_else(|| GenerateError::LayerConfiguration(vec![layer.clone()]))?;
            chosen.insert(
                layer.clone(),
                ChosenTrait {
                    trait_name: option.trait_name.clone(),
                    rarity_tier: option.rarity_tier.clone(),
                    asset_locator: option.asset_locator.clone(),
                },
            );
        }

        let signature = combo_signature(&chosen);
        if !used.is_new_and_record(&signature) {
            continue;
        }

        let edition = Edition {
            token_id: created + 1,
            chosen,
            signature,
        };

        let image = compositor.compose(&edition.chosen)?;
        save_png(&image, &layout.image_path(edition.token_id))?;
        write_json(
            &build_metadata(&edition, config),
            &layout.metadata_path(edition.token_id),
        )?;
        manifest.append(&edition)?;
        created += 1;
    }

    // Flush whatever was produced before deciding success or failure
    manifest.finish()?;

    if created < config.supply {
        return Err(GenerateError::ExhaustedRetryBudget {
            created,
            attempts,
            supply: config.supply,
        });
    }

    write_readme(&layout.readme_path())?;
    Ok(GenerationReport { created, attempts })
}
