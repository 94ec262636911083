//! Error types for codebook evolution.
//!
//! Every failure surfaces as a typed [`Error`]: configuration problems are
//! caught by validation before a run starts, corpus-shape problems are
//! caught at the ingestion boundary, and evaluation defects abort the
//! in-flight generation. Nothing is retried and no sentinel score is ever
//! substituted for a failed evaluation.

use crate::codebook::PATCH_SIDE;

/// Failure conditions of the evolutionary optimizer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Invalid parameter combination, detected at construction.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The corpus contains no images.
    #[error("corpus contains no images")]
    EmptyCorpus,

    /// An image's pixel buffer does not form a square matrix.
    #[error("pixel buffer of length {len} is not a {side}x{side} square")]
    NotSquare { side: usize, len: usize },

    /// An image side cannot be partitioned into 3x3 blocks.
    #[error("image side {side} is not divisible by {PATCH_SIDE}")]
    NotBlockAligned { side: usize },

    /// An image's shape is inconsistent with the rest of the corpus.
    #[error("image side {actual} does not match corpus side {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A pixel value outside {0, 1}.
    #[error("pixel value {value} is not binary")]
    NonBinaryPixel { value: u8 },

    /// A fitness computation produced an unusable score.
    #[error("fitness evaluation failed: {0}")]
    Evaluation(String),

    /// A stored codebook could not be reloaded.
    #[error("codebook persistence: {0}")]
    Persistence(String),
}
