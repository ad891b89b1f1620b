//! Trait sources - pluggable suppliers of per-layer trait tables
//!
//! A `TraitSource` is anything that can produce the layer tables the
//! generator samples from. The catalog CSV is the usual source; a
//! directory tree of per-layer PNGs and a static in-memory table cover
//! the asset-folder and test/dry-run workflows with the same pipeline.

use std::path::PathBuf;

use crate::catalog::{load_catalog, CatalogError, UNKNOWN_RARITY};
use crate::models::{AssetLocator, LayerTables, TraitOption};

/// Supplier of layer tables for one generation run.
pub trait TraitSource {
    fn layer_tables(&self) -> Result<LayerTables, CatalogError>;
}

/// CSV catalog-backed source (the default).
pub struct CatalogSource {
    csv_path: PathBuf,
}

impl CatalogSource {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
        }
    }
}

impl TraitSource for CatalogSource {
    fn layer_tables(&self) -> Result<LayerTables, CatalogError> {
        load_catalog(&self.csv_path)
    }
}

/// Directory-scan source: every subdirectory of `root` is a layer and
/// every `*.png` inside it is a trait option.
///
/// The trait name is the file stem; a trailing `#<number>` on the stem
/// sets the sampling weight (e.g. `gold_chain#3.png` weighs 3),
/// otherwise the weight is 1. Rarity tiers are not expressible here and
/// default to `"unknown"`. Layers and files are sorted by name so scans
/// are reproducible across platforms.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TraitSource for DirectorySource {
    fn layer_tables(&self) -> Result<LayerTables, CatalogError> {
        if !self.root.exists() {
            return Err(CatalogError::NotFound(self.root.clone()));
        }

        let mut layers: Vec<PathBuf> = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                layers.push(entry.path());
            }
        }
        layers.sort();

        let mut tables = LayerTables::new();
        for layer_dir in layers {
            let layer = match layer_dir.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };

            let pattern = layer_dir.join("*.png");
            let mut files: Vec<PathBuf> = Vec::new();
            for path in glob::glob(&pattern.to_string_lossy())? {
                files.push(path?);
            }
            files.sort();

            let options = tables.entry(layer.clone()).or_default();
            for path in files {
                let stem = match path.file_stem().and_then(|s| s.to_str()) {
                    Some(stem) => stem,
                    None => continue,
                };
                let (trait_name, weight) = split_weight_suffix(stem);
                options.push(TraitOption {
                    layer: layer.clone(),
                    trait_name,
                    asset_locator: AssetLocator::Local(path.clone()),
                    weight,
                    rarity_tier: UNKNOWN_RARITY.to_string(),
                });
            }
        }
        Ok(tables)
    }
}

/// Split an optional `#<number>` weight suffix off a file stem.
fn split_weight_suffix(stem: &str) -> (String, f64) {
    if let Some((name, raw)) = stem.rsplit_once('#') {
        if let Ok(weight) = raw.parse::<f64>() {
            if weight.is_finite() && weight >= 0.0 && !name.is_empty() {
                return (name.to_string(), weight);
            }
        }
    }
    (stem.to_string(), 1.0)
}

/// Fixed in-memory source for tests and dry runs.
pub struct StaticSource {
    tables: LayerTables,
}

impl StaticSource {
    pub fn new(tables: LayerTables) -> Self {
        Self { tables }
    }
}

impl TraitSource for StaticSource {
    fn layer_tables(&self) -> Result<LayerTables, CatalogError> {
        Ok(self.tables.clone())
    }
}
