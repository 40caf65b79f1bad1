//! Deterministic RNG using PCG32 with BLAKE3 seed derivation.
//!
//! Noise oscillators draw from this module only, so a render is a pure
//! function of its inputs. Each step gets its own derived stream, which keeps
//! a note's noise identical no matter which other steps are filled.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Derives the seed for the note on `step` from the render seed.
///
/// Hashes the little-endian bytes of `base_seed` followed by `step` with
/// BLAKE3 and keeps the first four bytes.
pub fn derive_step_seed(base_seed: u32, step: u32) -> u32 {
    let mut input = Vec::with_capacity(8);
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(&step.to_le_bytes());

    let hash = blake3::hash(&input);
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_rng_determinism() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(42);

        let values1: Vec<f64> = (0..100).map(|_| rng1.gen()).collect();
        let values2: Vec<f64> = (0..100).map(|_| rng2.gen()).collect();

        assert_eq!(values1, values2);
    }

    #[test]
    fn test_different_seeds_produce_different_sequences() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(43);

        let values1: Vec<f64> = (0..10).map(|_| rng1.gen()).collect();
        let values2: Vec<f64> = (0..10).map(|_| rng2.gen()).collect();

        assert_ne!(values1, values2);
    }

    #[test]
    fn test_step_seed_derivation() {
        assert_eq!(derive_step_seed(7, 3), derive_step_seed(7, 3));
        assert_ne!(derive_step_seed(7, 3), derive_step_seed(7, 4));
        assert_ne!(derive_step_seed(7, 3), derive_step_seed(8, 3));
    }
}
