//! Preflight checks - validate a trait source before generating
//!
//! Catches the problems that would otherwise surface mid-run: layers
//! with no options, locally missing asset files, and a combination
//! space too small for the requested supply.

use crate::models::{AssetLocator, LayerTables};

/// Findings for one layer in compositing order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerCheck {
    pub layer: String,
    /// Number of trait options available
    pub options: usize,
    /// Local asset locators that do not exist on disk
    pub missing: Vec<String>,
    /// Remote locators (existence is not verified offline)
    pub remote: usize,
}

impl LayerCheck {
    pub fn passed(&self) -> bool {
        self.options > 0 && self.missing.is_empty()
    }
}

/// Full preflight report for one layer order.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub layers: Vec<LayerCheck>,
    /// Product of per-layer option counts (saturating)
    pub total_combinations: u128,
    /// Requested supply, when known
    pub supply: Option<u32>,
}

impl CheckReport {
    /// True when every layer has options, every local asset exists,
    /// and the combination space covers the requested supply.
    pub fn passed(&self) -> bool {
        self.layers.iter().all(LayerCheck::passed)
            && self
                .supply
                .map_or(true, |supply| self.total_combinations >= supply as u128)
    }
}

/// Run all preflight checks for `layer_order` against `tables`.
///
/// A layer named in the order but absent from the tables appears in
/// the report with zero options.
pub fn preflight(tables: &LayerTables, layer_order: &[String], supply: Option<u32>) -> CheckReport {
    let mut layers = Vec::with_capacity(layer_order.len());
    let mut total_combinations: u128 = 1;

    for layer in layer_order {
        let options = tables.get(layer).map(Vec::as_slice).unwrap_or(&[]);

        let mut missing = Vec::new();
        let mut remote = 0;
        for option in options {
            match &option.asset_locator {
                AssetLocator::Local(path) => {
                    if !path.exists() {
                        missing.push(option.asset_locator.to_string());
                    }
                }
                AssetLocator::Remote(_) => remote += 1,
            }
        }

        total_combinations = total_combinations.saturating_mul(options.len() as u128);
        layers.push(LayerCheck {
            layer: layer.clone(),
            options: options.len(),
            missing,
            remote,
        });
    }

    CheckReport {
        layers,
        total_combinations,
        supply,
    }
}
