//! Run-scoped generation configuration

use std::path::PathBuf;

/// Immutable settings for one generation run.
///
/// An empty `layer_order` means "use the source's first-seen layer
/// order"; a non-empty one overrides it and must name only layers that
/// actually have trait options.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Root output directory (images/, metadata/ and manifest.csv live under it)
    pub outdir: PathBuf,
    /// Number of editions to produce
    pub supply: u32,
    /// Token name prefix; the token id is appended (e.g. "Edition #" -> "Edition #7")
    pub name_prefix: String,
    /// Fixed description carried into every metadata document
    pub description: String,
    /// Base URI for the metadata directory (contract baseURI)
    pub base_uri: String,
    /// Optional base URI specifically for images; defaults to `{base_uri}/images`
    pub images_base_uri: Option<String>,
    /// Optional external_url metadata field
    pub external_url: Option<String>,
    /// Bottom-to-top compositing order; empty = source order
    pub layer_order: Vec<String>,
    /// PRNG seed for reproducible runs
    pub seed: Option<u64>,
    /// Maximum draw attempts before giving up on reaching `supply`
    pub max_retries: u32,
    /// Forced canvas size; when unset the first layer's natural size wins
    pub forced_size: Option<(u32, u32)>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            outdir: PathBuf::from("output"),
            supply: 10,
            name_prefix: "Edition #".to_string(),
            description: String::new(),
            base_uri: "ipfs://METADATA_CID/".to_string(),
            images_base_uri: None,
            external_url: None,
            layer_order: Vec::new(),
            seed: None,
            max_retries: 100_000,
            forced_size: None,
        }
    }
}

impl GenerationConfig {
    /// The base URI image references are joined onto, without a
    /// trailing slash.
    pub fn images_base(&self) -> String {
        match &self.images_base_uri {
            Some(uri) => uri.trim_end_matches('/').to_string(),
            None => format!("{}/images", self.base_uri.trim_end_matches('/')),
        }
    }
}

/// Parse a comma-separated layer order override.
///
/// Whitespace around entries is trimmed and empty entries are dropped.
/// `None` or an effectively empty string yields an empty order, which
/// callers treat as "use the source's layer order".
pub fn parse_layer_order(arg: Option<&str>) -> Vec<String> {
    match arg {
        Some(s) => s
            .split(',')
            .map(|x| x.trim())
            .filter(|x| !x.is_empty())
            .map(|x| x.to_string())
            .collect(),
        None => Vec::new(),
    }
}
