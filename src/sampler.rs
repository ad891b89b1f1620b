//! Weighted random trait selection

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::models::TraitOption;

/// Build the run's PRNG.
///
/// A fixed seed reproduces the full edition sequence on any machine;
/// without one the generator draws from OS entropy.
pub fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Draw one trait from a layer's options, with probability proportional
/// to weight.
///
/// Weights are relative and do not need to sum to anything. When every
/// weight is zero the draw degrades to uniform selection so a layer
/// with at least one option can always produce a trait. Returns `None`
/// only for an empty slice.
pub fn choose_trait<'a, R: Rng + ?Sized>(
    options: &'a [TraitOption],
    rng: &mut R,
) -> Option<&'a TraitOption> {
    if options.is_empty() {
        return None;
    }
    match WeightedIndex::new(options.iter().map(|o| o.weight)) {
        Ok(dist) => Some(&options[dist.sample(rng)]),
        // All weights zero: fall back to a uniform draw
        Err(_) => Some(&options[rng.gen_range(0..options.len())]),
    }
}
