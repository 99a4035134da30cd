//! Deterministic seed derivation and bounded random draws for generation.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

/// Mixes a run seed with the level index so every level of a run draws from
/// an independent stream.
pub fn derive_level_seed(run_seed: u64, level_index: u8) -> u64 {
    let mut mixed = run_seed ^ 0x9E37_79B9_7F4A_7C15;
    mixed ^= (level_index as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}

pub(super) fn random_usize(rng: &mut ChaCha8Rng, min_value: usize, max_value: usize) -> usize {
    debug_assert!(min_value <= max_value);
    let range_size = (max_value - min_value + 1) as u64;
    min_value + (rng.next_u64() % range_size) as usize
}
