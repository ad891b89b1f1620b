//! ERC-721 style metadata documents

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::models::Edition;

/// One trait entry in a token's attribute list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
    pub rarity_tier: String,
}

/// The metadata document emitted per token.
///
/// Regenerable from an edition's selection plus the run configuration;
/// never hand-edited after the fact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_url: Option<String>,
    pub attributes: Vec<Attribute>,
}

/// Build the metadata document for one accepted edition.
///
/// `name` is the configured prefix with the token id appended, `image`
/// joins the images base URI with `{token_id}.png`, and `attributes`
/// carries one entry per layer in compositing order with the trait's
/// rarity tier as auxiliary data.
pub fn build_metadata(edition: &Edition, config: &GenerationConfig) -> TokenMetadata {
    let attributes = edition
        .chosen
        .iter()
        .map(|(layer, choice)| Attribute {
            trait_type: layer.clone(),
            value: choice.trait_name.clone(),
            rarity_tier: choice.rarity_tier.clone(),
        })
        .collect();

    TokenMetadata {
        name: format!("{}{}", config.name_prefix, edition.token_id),
        description: config.description.clone(),
        image: format!("{}/{}.png", config.images_base(), edition.token_id),
        external_url: config.external_url.clone(),
        attributes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetLocator, ChosenTrait, ChosenTraits};
    use std::path::PathBuf;

    fn edition() -> Edition {
        let chosen: ChosenTraits = [
            (
                "background".to_string(),
                ChosenTrait {
                    trait_name: "Night".to_string(),
                    rarity_tier: "common".to_string(),
                    asset_locator: AssetLocator::Local(PathBuf::from("night.png")),
                },
            ),
            (
                "head".to_string(),
                ChosenTrait {
                    trait_name: "Cap".to_string(),
                    rarity_tier: "rare".to_string(),
                    asset_locator: AssetLocator::Local(PathBuf::from("cap.png")),
                },
            ),
        ]
        .into_iter()
        .collect();
        Edition {
            token_id: 7,
            chosen,
            signature: "sig".to_string(),
        }
    }

    fn config() -> GenerationConfig {
        GenerationConfig {
            name_prefix: "Edition #".to_string(),
            description: "A layered collection".to_string(),
            base_uri: "ipfs://META/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_metadata_fields() {
        let meta = build_metadata(&edition(), &config());
        assert_eq!(meta.name, "Edition #7");
        assert_eq!(meta.description, "A layered collection");
        assert_eq!(meta.image, "ipfs://META/images/7.png");
        assert!(meta.external_url.is_none());
    }

    #[test]
    fn test_attributes_follow_layer_order() {
        let meta = build_metadata(&edition(), &config());
        assert_eq!(meta.attributes.len(), 2);
        assert_eq!(meta.attributes[0].trait_type, "background");
        assert_eq!(meta.attributes[0].value, "Night");
        assert_eq!(meta.attributes[0].rarity_tier, "common");
        assert_eq!(meta.attributes[1].trait_type, "head");
        assert_eq!(meta.attributes[1].value, "Cap");
        assert_eq!(meta.attributes[1].rarity_tier, "rare");
    }

    #[test]
    fn test_images_suburi_override() {
        let mut cfg = config();
        cfg.images_base_uri = Some("ar://IMAGES/".to_string());
        let meta = build_metadata(&edition(), &cfg);
        assert_eq!(meta.image, "ar://IMAGES/7.png");
    }

    #[test]
    fn test_external_url_serialization() {
        let mut cfg = config();
        let without = serde_json::to_value(build_metadata(&edition(), &cfg)).unwrap();
        assert!(without.get("external_url").is_none());

        cfg.external_url = Some("https://example.com".to_string());
        let with = serde_json::to_value(build_metadata(&edition(), &cfg)).unwrap();
        assert_eq!(with["external_url"], "https://example.com");
    }

    #[test]
    fn test_metadata_json_shape() {
        let json = serde_json::to_value(build_metadata(&edition(), &config())).unwrap();
        assert_eq!(json["name"], "Edition #7");
        assert_eq!(json["attributes"][0]["trait_type"], "background");
        assert_eq!(json["attributes"][0]["value"], "Night");
        assert_eq!(json["attributes"][0]["rarity_tier"], "common");
    }

    #[test]
    fn test_metadata_roundtrip() {
        let meta = build_metadata(&edition(), &config());
        let json = serde_json::to_string(&meta).unwrap();
        let parsed: TokenMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(meta, parsed);
    }
}
