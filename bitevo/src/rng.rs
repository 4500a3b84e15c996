use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Returns `true` with probability `chance`.
///
/// `gen::<f64>()` samples `[0, 1)`, so a chance of `0.0`
/// never succeeds and a chance of `1.0` always does,
/// regardless of the generator's state.
pub(crate) fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    rng.gen::<f64>() < chance
}

/// Builds the population's generator, seeded for
/// reproducible runs or from entropy otherwise.
pub(crate) fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}
