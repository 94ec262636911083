//! Reconstruction-loss fitness evaluation.
//!
//! A codebook's quality is how well it reconstructs the corpus when every
//! 3x3 block of every image is replaced by its Hamming-nearest pattern.
//! [`evaluate`] returns the *negated* mean percentage loss so that all
//! callers uniformly maximize, and [`reconstruct`] rebuilds an image with
//! the exact same nearest-pattern assignment — both go through [`nearest`],
//! so fitness and reconstruction can never disagree.
//!
//! Everything here is a pure function of its arguments: no randomness, no
//! shared mutable state. The evolutionary loop relies on this to fan
//! evaluations out across rayon workers without synchronization.

use crate::codebook::{Codebook, PATCH_BITS, PATCH_SIDE};
use crate::corpus::BinaryImage;
use crate::error::Error;

/// Index and Hamming distance of the pattern nearest to `block`.
///
/// Ties resolve to the lowest pattern index.
pub fn nearest(codebook: &Codebook, block: &[u8; PATCH_BITS]) -> (usize, u32) {
    let patterns = codebook.patterns();
    let mut best_idx = 0;
    let mut best_dist = patterns[0].distance(block);
    for (idx, pattern) in patterns.iter().enumerate().skip(1) {
        let dist = pattern.distance(block);
        if dist < best_dist {
            best_idx = idx;
            best_dist = dist;
        }
    }
    (best_idx, best_dist)
}

/// Total nearest-pattern distance over all blocks of one image.
pub fn image_distance(codebook: &Codebook, image: &BinaryImage) -> u32 {
    let grid = image.blocks_per_side();
    let mut total = 0u32;
    for block_row in 0..grid {
        for block_col in 0..grid {
            let block = image.block(block_row, block_col);
            total += nearest(codebook, &block).1;
        }
    }
    total
}

/// Mean percentage reconstruction loss of `codebook` over `images`.
///
/// Each image contributes its total block distance normalized by its pixel
/// count; the per-image ratios are averaged and scaled to a percentage.
pub fn mean_loss(codebook: &Codebook, images: &[BinaryImage]) -> Result<f64, Error> {
    if images.is_empty() {
        return Err(Error::EmptyCorpus);
    }
    let mut accumulated = 0.0f64;
    for image in images {
        accumulated += f64::from(image_distance(codebook, image)) / image.pixel_count() as f64;
    }
    let loss = accumulated / images.len() as f64 * 100.0;
    if !loss.is_finite() {
        return Err(Error::Evaluation(format!("non-finite loss {loss}")));
    }
    Ok(loss)
}

/// Fitness score: the negation of [`mean_loss`]. Higher is better.
pub fn evaluate(codebook: &Codebook, images: &[BinaryImage]) -> Result<f64, Error> {
    mean_loss(codebook, images).map(|loss| -loss)
}

/// Rebuilds `image` by replacing every block with its nearest pattern.
///
/// Uses the same assignment as [`evaluate`], so
/// `reconstruction_loss(image, &reconstruct(codebook, image))` equals the
/// image's contribution to [`mean_loss`].
pub fn reconstruct(codebook: &Codebook, image: &BinaryImage) -> BinaryImage {
    let side = image.side();
    let grid = image.blocks_per_side();
    let mut pixels = vec![0u8; image.pixel_count()];
    for block_row in 0..grid {
        for block_col in 0..grid {
            let block = image.block(block_row, block_col);
            let (idx, _) = nearest(codebook, &block);
            let rows = codebook.patterns()[idx].rows();
            for r in 0..PATCH_SIDE {
                for c in 0..PATCH_SIDE {
                    let row = block_row * PATCH_SIDE + r;
                    let col = block_col * PATCH_SIDE + c;
                    pixels[row * side + col] = rows[r][c];
                }
            }
        }
    }
    BinaryImage::new(side, pixels).expect("reconstruction preserves the input shape")
}

/// Percentage of pixels that differ between two same-shape images.
///
/// # Panics
/// Panics if the images have different sides.
pub fn reconstruction_loss(original: &BinaryImage, reconstructed: &BinaryImage) -> f64 {
    assert_eq!(
        original.side(),
        reconstructed.side(),
        "images must have equal sides"
    );
    let differing = original
        .pixels()
        .iter()
        .zip(reconstructed.pixels())
        .filter(|(a, b)| a != b)
        .count();
    differing as f64 / original.pixel_count() as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codebook::{Pattern, CODEBOOK_SIZE};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn pattern_of(bit: u8) -> Pattern {
        Pattern::from_rows([[bit; PATCH_SIDE]; PATCH_SIDE]).unwrap()
    }

    fn uniform_codebook(bit: u8) -> Codebook {
        Codebook::new([pattern_of(bit); CODEBOOK_SIZE])
    }

    fn random_image<R: Rng>(side: usize, rng: &mut R) -> BinaryImage {
        let pixels = (0..side * side).map(|_| rng.random_range(0..2)).collect();
        BinaryImage::new(side, pixels).unwrap()
    }

    #[test]
    fn test_nearest_ties_resolve_to_lowest_index() {
        let book = uniform_codebook(0);
        let (idx, dist) = nearest(&book, &[0; PATCH_BITS]);
        assert_eq!(idx, 0);
        assert_eq!(dist, 0);
        let (idx, dist) = nearest(&book, &[1; PATCH_BITS]);
        assert_eq!(idx, 0);
        assert_eq!(dist, 9);
    }

    #[test]
    fn test_nearest_prefers_closer_pattern() {
        let mut patterns = [pattern_of(0); CODEBOOK_SIZE];
        patterns[4] = pattern_of(1);
        let book = Codebook::new(patterns);
        let mostly_ones = [1, 1, 1, 1, 1, 1, 1, 1, 0];
        assert_eq!(nearest(&book, &mostly_ones), (4, 1));
    }

    #[test]
    fn test_perfect_codebook_has_zero_loss() {
        let book = uniform_codebook(0);
        let images = vec![BinaryImage::filled(24, 0).unwrap()];
        assert_eq!(mean_loss(&book, &images).unwrap(), 0.0);
        assert_eq!(evaluate(&book, &images).unwrap(), 0.0);
    }

    #[test]
    fn test_total_mismatch_is_one_hundred_percent() {
        let book = uniform_codebook(0);
        let images = vec![BinaryImage::filled(24, 1).unwrap()];
        assert_eq!(mean_loss(&book, &images).unwrap(), 100.0);
        assert_eq!(evaluate(&book, &images).unwrap(), -100.0);
    }

    #[test]
    fn test_loss_averages_over_images() {
        let book = uniform_codebook(0);
        let images = vec![
            BinaryImage::filled(6, 0).unwrap(),
            BinaryImage::filled(6, 1).unwrap(),
        ];
        assert_eq!(mean_loss(&book, &images).unwrap(), 50.0);
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let book = uniform_codebook(0);
        assert_eq!(mean_loss(&book, &[]).unwrap_err(), Error::EmptyCorpus);
        assert_eq!(evaluate(&book, &[]).unwrap_err(), Error::EmptyCorpus);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(11);
        let book = Codebook::random(&mut rng);
        let images = vec![random_image(24, &mut rng), random_image(24, &mut rng)];
        let a = evaluate(&book, &images).unwrap();
        let b = evaluate(&book, &images).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_reconstruction_matches_fitness_assignment() {
        let mut rng = StdRng::seed_from_u64(23);
        let book = Codebook::random(&mut rng);
        let image = random_image(24, &mut rng);
        let rebuilt = reconstruct(&book, &image);

        // Every output block is exactly the pattern fitness would pick.
        for block_row in 0..image.blocks_per_side() {
            for block_col in 0..image.blocks_per_side() {
                let (idx, _) = nearest(&book, &image.block(block_row, block_col));
                let expected = book.patterns()[idx];
                let mut flat = [0u8; PATCH_BITS];
                for i in 0..PATCH_BITS {
                    flat[i] = expected.bit(i);
                }
                assert_eq!(rebuilt.block(block_row, block_col), flat);
            }
        }

        // The pixel error of the rebuilt image equals the fitness loss.
        let loss = mean_loss(&book, std::slice::from_ref(&image)).unwrap();
        assert!((reconstruction_loss(&image, &rebuilt) - loss).abs() < 1e-12);
    }

    #[test]
    fn test_representable_image_reconstructs_exactly() {
        let mut rng = StdRng::seed_from_u64(31);
        let book = Codebook::random(&mut rng);

        // Tile a 24x24 image out of codebook patterns.
        let mut pixels = vec![0u8; 576];
        for block_row in 0..8 {
            for block_col in 0..8 {
                let pattern = book.patterns()[(block_row * 8 + block_col) % CODEBOOK_SIZE];
                for r in 0..PATCH_SIDE {
                    for c in 0..PATCH_SIDE {
                        pixels[(block_row * 3 + r) * 24 + block_col * 3 + c] =
                            pattern.rows()[r][c];
                    }
                }
            }
        }
        let image = BinaryImage::new(24, pixels).unwrap();

        assert_eq!(mean_loss(&book, std::slice::from_ref(&image)).unwrap(), 0.0);
        assert_eq!(reconstruct(&book, &image), image);
    }

    #[test]
    fn test_image_distance_single_block() {
        let mut patterns = [pattern_of(1); CODEBOOK_SIZE];
        patterns[0] = Pattern::from_rows([[1, 0, 0], [0, 0, 0], [0, 0, 0]]).unwrap();
        let book = Codebook::new(patterns);
        let image = BinaryImage::filled(3, 0).unwrap();
        // Nearest is pattern 0 at distance 1 (the all-ones entries cost 9).
        assert_eq!(image_distance(&book, &image), 1);
    }
}
