//! Pattern and codebook representation.
//!
//! A [`Codebook`] is the unit the algorithm evolves: an ordered collection
//! of exactly [`CODEBOOK_SIZE`] binary [`Pattern`]s. Pattern order matters
//! only for crossover locus semantics; fitness is order-invariant because
//! reconstruction always searches for the nearest pattern.
//!
//! Both types have plain value semantics: cloning a codebook yields a fully
//! independent copy, so elites carried across generations and crossover
//! children never alias their sources.
//!
//! # Persistence
//!
//! Codebooks serialize as a nested `(7, 3, 3)` array of 0/1 values, so a
//! stored best solution can be reloaded by downstream tooling:
//!
//! ```
//! use patchbook::Codebook;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let book = Codebook::random(&mut rng);
//! let reloaded = Codebook::from_json(&book.to_json()).unwrap();
//! assert_eq!(book, reloaded);
//! ```

use crate::error::Error;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of patterns in a codebook.
pub const CODEBOOK_SIZE: usize = 7;

/// Side length of a pattern (and of an image block).
pub const PATCH_SIDE: usize = 3;

/// Bits per pattern.
pub const PATCH_BITS: usize = PATCH_SIDE * PATCH_SIDE;

/// A 3x3 binary pattern, the reconstruction primitive.
///
/// Bits are addressed either by `(row, col)` or by a flat index `i` mapping
/// to `(i / 3, i % 3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern {
    rows: [[u8; PATCH_SIDE]; PATCH_SIDE],
}

impl Pattern {
    /// Creates a pattern from explicit rows. Values must be 0 or 1.
    pub fn from_rows(rows: [[u8; PATCH_SIDE]; PATCH_SIDE]) -> Result<Self, Error> {
        for row in &rows {
            for &bit in row {
                if bit > 1 {
                    return Err(Error::NonBinaryPixel { value: bit });
                }
            }
        }
        Ok(Self { rows })
    }

    /// Creates a pattern with uniformly random bits.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut rows = [[0u8; PATCH_SIDE]; PATCH_SIDE];
        for row in &mut rows {
            for bit in row.iter_mut() {
                *bit = rng.random_range(0..2);
            }
        }
        Self { rows }
    }

    /// Returns the pattern as rows of bits.
    pub fn rows(&self) -> &[[u8; PATCH_SIDE]; PATCH_SIDE] {
        &self.rows
    }

    /// Returns the bit at flat index `i` (row-major, `0..9`).
    pub fn bit(&self, i: usize) -> u8 {
        self.rows[i / PATCH_SIDE][i % PATCH_SIDE]
    }

    /// Inverts the bit at flat index `i`.
    pub fn flip(&mut self, i: usize) {
        let bit = &mut self.rows[i / PATCH_SIDE][i % PATCH_SIDE];
        *bit = 1 - *bit;
    }

    /// Number of 1-bits in the pattern.
    pub fn ones(&self) -> u32 {
        self.rows
            .iter()
            .flatten()
            .map(|&b| u32::from(b))
            .sum()
    }

    /// Hamming distance to a flattened 3x3 block.
    pub fn distance(&self, block: &[u8; PATCH_BITS]) -> u32 {
        let mut d = 0u32;
        for i in 0..PATCH_BITS {
            d += u32::from(self.bit(i) != block[i]);
        }
        d
    }
}

/// A dictionary of [`CODEBOOK_SIZE`] patterns: one candidate solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Codebook {
    patterns: [Pattern; CODEBOOK_SIZE],
}

impl Codebook {
    /// Creates a codebook from explicit patterns.
    pub fn new(patterns: [Pattern; CODEBOOK_SIZE]) -> Self {
        Self { patterns }
    }

    /// Creates a codebook of uniformly random patterns.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            patterns: std::array::from_fn(|_| Pattern::random(rng)),
        }
    }

    /// The patterns, in crossover-locus order.
    pub fn patterns(&self) -> &[Pattern; CODEBOOK_SIZE] {
        &self.patterns
    }

    pub(crate) fn patterns_mut(&mut self) -> &mut [Pattern; CODEBOOK_SIZE] {
        &mut self.patterns
    }

    /// Serializes to a nested `(7, 3, 3)` JSON array.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("nested bit arrays always serialize")
    }

    /// Reloads a codebook stored with [`to_json`](Self::to_json).
    ///
    /// Rejects arrays of the wrong shape and non-binary values.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let book: Self =
            serde_json::from_str(json).map_err(|e| Error::Persistence(e.to_string()))?;
        for pattern in &book.patterns {
            for &bit in pattern.rows.iter().flatten() {
                if bit > 1 {
                    return Err(Error::NonBinaryPixel { value: bit });
                }
            }
        }
        Ok(book)
    }
}
