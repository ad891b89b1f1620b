//! Trait catalog loading - CSV table to per-layer trait tables
//!
//! The catalog is a flat CSV with one row per trait option. Required
//! columns: `layer`, `trait_name`, `file`, `weight`, `rarity_tier`.
//! Extra columns (such as `notes`) are ignored and never leak into
//! output metadata.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{AssetLocator, LayerTables, TraitOption};

/// Columns every catalog must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = ["layer", "trait_name", "file", "weight", "rarity_tier"];

/// Rarity label used when a row leaves the tier blank.
pub const UNKNOWN_RARITY: &str = "unknown";

/// Error type for trait-source loading failures
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file does not exist
    #[error("traits catalog not found at: {0}")]
    NotFound(PathBuf),
    /// One or more required columns are absent from the header
    #[error("catalog is missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    /// Malformed CSV content
    #[error("catalog read error: {0}")]
    Csv(#[from] csv::Error),
    /// Filesystem error while scanning a trait directory
    #[error("trait directory error: {0}")]
    Io(#[from] io::Error),
    /// Invalid scan pattern for a trait directory
    #[error("invalid scan pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    /// Unreadable entry while scanning a trait directory
    #[error("unreadable scan entry: {0}")]
    Glob(#[from] glob::GlobError),
}

/// Load a trait catalog CSV into per-layer tables.
///
/// Layer order in the result is the first-seen order of the `layer`
/// column; rows within a layer keep their file order. Relative `file`
/// values are resolved against the catalog's own directory.
///
/// # Coercion rules
///
/// - Non-numeric, negative or non-finite weights become `0.0`
/// - Blank rarity tiers become `"unknown"`
///
/// # Errors
///
/// `CatalogError::NotFound` if the file is absent,
/// `CatalogError::MissingColumns` naming every absent required column
/// (sorted), `CatalogError::Csv` for malformed rows.
pub fn load_catalog(csv_path: &Path) -> Result<LayerTables, CatalogError> {
    if !csv_path.exists() {
        return Err(CatalogError::NotFound(csv_path.to_path_buf()));
    }
    let base_dir = csv_path.parent().unwrap_or(Path::new(".")).to_path_buf();

    let mut reader = csv::Reader::from_path(csv_path)?;
    let headers = reader.headers()?.clone();

    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == **c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(CatalogError::MissingColumns(missing));
    }

    let col = |name: &str| -> usize {
        headers
            .iter()
            .position(|h| h == name)
            .unwrap_or(usize::MAX)
    };
    let (layer_col, trait_col, file_col, weight_col, rarity_col) = (
        col("layer"),
        col("trait_name"),
        col("file"),
        col("weight"),
        col("rarity_tier"),
    );

    let mut tables = LayerTables::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let layer = field(layer_col).to_string();
        let trait_name = field(trait_col).to_string();
        let asset_locator = AssetLocator::parse(field(file_col), &base_dir);
        let weight = coerce_weight(field(weight_col));
        let rarity = field(rarity_col);
        let rarity_tier = if rarity.is_empty() {
            UNKNOWN_RARITY.to_string()
        } else {
            rarity.to_string()
        };

        tables.entry(layer.clone()).or_default().push(TraitOption {
            layer,
            trait_name,
            asset_locator,
            weight,
            rarity_tier,
        });
    }
    Ok(tables)
}

/// Coerce a raw weight field to a usable sampling weight.
///
/// Anything unparseable, negative or non-finite becomes 0 so a bad row
/// can never abort a run or poison the weighted draw.
pub fn coerce_weight(raw: &str) -> f64 {
    let weight: f64 = raw.parse().unwrap_or(0.0);
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_catalog(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("traits_catalog.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_basic_catalog() {
        let dir = tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            "layer,trait_name,file,weight,rarity_tier\n\
             background,Night,layers/night.png,10,common\n\
             background,Dawn,layers/dawn.png,2.5,rare\n\
             head,Cap,layers/cap.png,1,common\n",
        );

        let tables = load_catalog(&path).unwrap();
        assert_eq!(tables.len(), 2);

        let background = &tables["background"];
        assert_eq!(background.len(), 2);
        assert_eq!(background[0].trait_name, "Night");
        assert_eq!(background[0].weight, 10.0);
        assert_eq!(background[1].weight, 2.5);
        assert_eq!(background[1].rarity_tier, "rare");

        // Layer order is first-seen order
        let layers: Vec<&String> = tables.keys().collect();
        assert_eq!(layers, vec!["background", "head"]);
    }

    #[test]
    fn test_missing_columns_are_reported_sorted() {
        let dir = tempdir().unwrap();
        let path = write_catalog(dir.path(), "layer,file,notes\nbackground,a.png,x\n");

        let err = load_catalog(&path).unwrap_err();
        match err {
            CatalogError::MissingColumns(cols) => {
                assert_eq!(cols, vec!["rarity_tier", "trait_name", "weight"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_catalog(Path::new("/nonexistent/traits.csv")).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn test_weight_coercion() {
        assert_eq!(coerce_weight("3.5"), 3.5);
        assert_eq!(coerce_weight("abc"), 0.0);
        assert_eq!(coerce_weight(""), 0.0);
        assert_eq!(coerce_weight("-4"), 0.0);
        assert_eq!(coerce_weight("NaN"), 0.0);
        assert_eq!(coerce_weight("inf"), 0.0);
    }

    #[test]
    fn test_bad_weight_rows_load_as_zero() {
        let dir = tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            "layer,trait_name,file,weight,rarity_tier\n\
             background,Night,night.png,oops,common\n",
        );

        let tables = load_catalog(&path).unwrap();
        assert_eq!(tables["background"][0].weight, 0.0);
    }

    #[test]
    fn test_blank_rarity_defaults_to_unknown() {
        let dir = tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            "layer,trait_name,file,weight,rarity_tier\n\
             background,Night,night.png,1,\n",
        );

        let tables = load_catalog(&path).unwrap();
        assert_eq!(tables["background"][0].rarity_tier, UNKNOWN_RARITY);
    }

    #[test]
    fn test_relative_paths_resolve_against_catalog_dir() {
        let dir = tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            "layer,trait_name,file,weight,rarity_tier\n\
             background,Night,layers/night.png,1,common\n",
        );

        let tables = load_catalog(&path).unwrap();
        assert_eq!(
            tables["background"][0].asset_locator,
            AssetLocator::Local(dir.path().join("layers/night.png"))
        );
    }

    #[test]
    fn test_remote_locators_pass_through() {
        let dir = tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            "layer,trait_name,file,weight,rarity_tier\n\
             background,Night,ipfs://CID/night.png,1,common\n",
        );

        let tables = load_catalog(&path).unwrap();
        assert_eq!(
            tables["background"][0].asset_locator,
            AssetLocator::Remote("ipfs://CID/night.png".to_string())
        );
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let dir = tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            "layer,trait_name,file,weight,rarity_tier,notes\n\
             background,Night,night.png,1,common,internal scribble\n",
        );

        let tables = load_catalog(&path).unwrap();
        assert_eq!(tables["background"][0].trait_name, "Night");
    }
}
