//! Tournament selection.
//!
//! Parents are chosen by repeated tournaments: each round samples a handful
//! of *distinct* individuals from the scored population and keeps the one
//! with the highest fitness score. Rounds are independent, so a strong
//! individual can win several tournaments and appear multiple times in the
//! parent pool.
//!
//! Higher tournament sizes mean stronger selection pressure; size 1
//! degenerates to uniform random selection.

use rand::seq::index;
use rand::Rng;

/// Runs one tournament round and returns the winning index.
///
/// Samples `k` distinct indices of `scores` without replacement and returns
/// the one with the maximum score; ties go to the first-encountered draw
/// (the sampling order is itself random).
///
/// # Panics
/// Panics if `scores` is empty or `k` is not in `1..=scores.len()`.
pub fn tournament<R: Rng>(scores: &[f64], k: usize, rng: &mut R) -> usize {
    assert!(!scores.is_empty(), "cannot select from an empty population");
    assert!(
        (1..=scores.len()).contains(&k),
        "tournament size {k} out of range for population of {}",
        scores.len()
    );

    let contenders = index::sample(rng, scores.len(), k);
    let mut winner = contenders.index(0);
    for idx in contenders.iter().skip(1) {
        if scores[idx] > scores[winner] {
            winner = idx;
        }
    }
    winner
}

/// Builds a parent-index pool with one tournament per population slot.
///
/// The returned pool has the same length as `scores`.
pub fn select_parents<R: Rng>(scores: &[f64], k: usize, rng: &mut R) -> Vec<usize> {
    (0..scores.len()).map(|_| tournament(scores, k, rng)).collect()
}
