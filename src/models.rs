//! Data models shared across the generation pipeline

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

/// Locator for a layer asset - either a file on disk or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetLocator {
    Local(PathBuf),
    Remote(String),
}

fn scheme_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Locators with an explicit URL scheme (http://, ipfs://, ar://, ...)
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://").expect("scheme pattern is valid"))
}

impl AssetLocator {
    /// Classify a raw locator string from a catalog row.
    ///
    /// Backslashes are normalized to forward slashes (they show up in
    /// catalogs authored on Windows). Anything matching a `scheme://`
    /// prefix is remote; everything else is a filesystem path, with
    /// relative paths resolved against `base_dir` (the catalog's own
    /// directory, not the process working directory).
    pub fn parse(raw: &str, base_dir: &Path) -> Self {
        let cleaned = raw.trim().replace('\\', "/");
        if scheme_re().is_match(&cleaned) {
            return AssetLocator::Remote(cleaned);
        }
        let path = PathBuf::from(&cleaned);
        if path.is_absolute() {
            AssetLocator::Local(path)
        } else {
            AssetLocator::Local(base_dir.join(path))
        }
    }

    /// True for `scheme://` locators.
    pub fn is_remote(&self) -> bool {
        matches!(self, AssetLocator::Remote(_))
    }
}

impl fmt::Display for AssetLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetLocator::Local(path) => write!(f, "{}", path.display()),
            AssetLocator::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// One selectable value for one layer, loaded from a trait source.
///
/// Immutable after load. `weight` is guaranteed non-negative and finite
/// by the loaders; an all-zero layer degrades to uniform selection in
/// the sampler rather than failing.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitOption {
    pub layer: String,
    pub trait_name: String,
    pub asset_locator: AssetLocator,
    pub weight: f64,
    pub rarity_tier: String,
}

/// Mapping from layer name to its trait options, preserving first-seen
/// layer order and per-layer row order from the source.
pub type LayerTables = IndexMap<String, Vec<TraitOption>>;

/// The trait picked for one layer of one edition.
#[derive(Debug, Clone, PartialEq)]
pub struct ChosenTrait {
    pub trait_name: String,
    pub rarity_tier: String,
    pub asset_locator: AssetLocator,
}

/// Full per-edition selection, iteration order = compositing layer order.
pub type ChosenTraits = IndexMap<String, ChosenTrait>;

/// One accepted output unit: a unique trait combination with its
/// sequential token id and canonical signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Edition {
    pub token_id: u32,
    pub chosen: ChosenTraits,
    pub signature: String,
}
