//! Genetic operators: two-point crossover and bit-flip mutation.
//!
//! Both operators work on whole codebooks and hand back independent values;
//! parents are never aliased by their children.

use crate::codebook::{Codebook, CODEBOOK_SIZE, PATCH_BITS};
use rand::seq::index;
use rand::Rng;

/// Two-point crossover over the pattern sequence.
///
/// Draws two distinct cut points from `[1, 6]`, sorts them as `(lo, hi)`,
/// and returns a copy of `parent_a` with the pattern range `[lo, hi)`
/// overwritten by `parent_b`'s patterns at the same indices. At least one
/// and at most six patterns are exchanged; the first and last pattern always
/// come from `parent_a`.
pub fn crossover<R: Rng>(parent_a: &Codebook, parent_b: &Codebook, rng: &mut R) -> Codebook {
    let cuts = index::sample(rng, CODEBOOK_SIZE - 1, 2);
    let (a, b) = (cuts.index(0) + 1, cuts.index(1) + 1);
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

    let mut child = parent_a.clone();
    child.patterns_mut()[lo..hi].copy_from_slice(&parent_b.patterns()[lo..hi]);
    child
}

/// Bit-flip mutation.
///
/// The rate plays a dual role. It is the per-pattern probability of being
/// mutated at all, *and* it scales how aggressively a mutated pattern
/// changes: `min(9, max(1, floor(9 * rate)))` distinct bit positions are
/// drawn without replacement and inverted. A low rate therefore means few
/// patterns change, each by a single bit; rate 1.0 inverts every bit of
/// every pattern.
pub fn mutate<R: Rng>(codebook: &mut Codebook, rate: f64, rng: &mut R) {
    let flips = ((PATCH_BITS as f64 * rate) as usize)
        .max(1)
        .min(PATCH_BITS);
    for pattern in codebook.patterns_mut() {
        if rng.random::<f64>() < rate {
            for bit in index::sample(rng, PATCH_BITS, flips).iter() {
                pattern.flip(bit);
            }
        }
    }
}
