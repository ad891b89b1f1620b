//! Canonical combination signatures and the per-run uniqueness set

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::models::ChosenTraits;

/// Compute the deterministic fingerprint of a trait selection.
///
/// Entries are sorted by layer name, joined as `layer:trait_name` pairs
/// with `|`, and hashed with SHA-256. The result is independent of draw
/// order and stable across machines and runs, so two editions with the
/// same selection always collide.
pub fn combo_signature(chosen: &ChosenTraits) -> String {
    let mut entries: Vec<(&str, &str)> = chosen
        .iter()
        .map(|(layer, choice)| (layer.as_str(), choice.trait_name.as_str()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let source = entries
        .iter()
        .map(|(layer, trait_name)| format!("{}:{}", layer, trait_name))
        .collect::<Vec<_>>()
        .join("|");

    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hex::encode(hasher.finalize())
}

/// The set of signatures already produced in this run.
///
/// Owned by the generation controller for the lifetime of one run and
/// passed by reference where needed; nothing here is static or shared
/// across runs.
#[derive(Debug, Default)]
pub struct SignatureSet {
    seen: HashSet<String>,
}

impl SignatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-and-insert in one step. Returns true if the signature was
    /// not seen before (and records it), false for a duplicate.
    pub fn is_new_and_record(&mut self, signature: &str) -> bool {
        self.seen.insert(signature.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetLocator, ChosenTrait};
    use std::path::PathBuf;

    fn chosen(pairs: &[(&str, &str)]) -> ChosenTraits {
        pairs
            .iter()
            .map(|(layer, trait_name)| {
                (
                    layer.to_string(),
                    ChosenTrait {
                        trait_name: trait_name.to_string(),
                        rarity_tier: "common".to_string(),
                        asset_locator: AssetLocator::Local(PathBuf::from("x.png")),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_signature_is_order_independent() {
        let ab = chosen(&[("a", "X"), ("b", "Y")]);
        let ba = chosen(&[("b", "Y"), ("a", "X")]);
        assert_eq!(combo_signature(&ab), combo_signature(&ba));
    }

    #[test]
    fn test_signature_differs_on_trait_change() {
        let xy = chosen(&[("a", "X"), ("b", "Y")]);
        let xz = chosen(&[("a", "X"), ("b", "Z")]);
        assert_ne!(combo_signature(&xy), combo_signature(&xz));
    }

    #[test]
    fn test_signature_ignores_rarity_and_locator() {
        let mut left = chosen(&[("a", "X")]);
        let mut right = chosen(&[("a", "X")]);
        left["a"].rarity_tier = "legendary".to_string();
        right["a"].asset_locator = AssetLocator::Remote("ipfs://other".to_string());
        assert_eq!(combo_signature(&left), combo_signature(&right));
    }

    #[test]
    fn test_signature_shape() {
        let sig = combo_signature(&chosen(&[("a", "X")]));
        // 256-bit digest as lowercase hex
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_signature_stable_across_calls() {
        let selection = chosen(&[("background", "Night"), ("head", "Cap")]);
        assert_eq!(combo_signature(&selection), combo_signature(&selection));
    }

    #[test]
    fn test_is_new_and_record() {
        let mut set = SignatureSet::new();
        assert!(set.is_empty());
        assert!(set.is_new_and_record("abc"));
        assert!(!set.is_new_and_record("abc"));
        assert!(set.is_new_and_record("def"));
        assert_eq!(set.len(), 2);
    }
}
