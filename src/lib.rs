//! Evolutionary vector quantization for binary images.
//!
//! Searches, via a genetic algorithm, for a small dictionary ([`Codebook`])
//! of binary 3x3 [`Pattern`]s that best reconstructs a corpus of binary
//! square images when each image is tiled into 3x3 blocks and every block
//! is replaced by its Hamming-nearest pattern.
//!
//! # Key Types
//!
//! - [`BinaryImage`] / [`Corpus`]: validated, immutable inputs
//! - [`Codebook`]: the evolved individual, 7 binary 3x3 patterns
//! - [`EvolutionConfig`]: algorithm parameters (population, rates, elitism)
//! - [`EvolutionRunner`]: executes the generational loop
//! - [`EvolutionResult`]: best codebook found plus the per-generation loss
//!   history
//!
//! # Submodules
//!
//! - [`fitness`]: reconstruction-loss evaluation and image reconstruction
//! - [`selection`]: tournament selection
//! - [`operators`]: two-point crossover and bit-flip mutation
//!
//! # Example
//!
//! ```
//! use patchbook::{BinaryImage, Corpus, EvolutionConfig, EvolutionRunner, fitness};
//!
//! let images = vec![BinaryImage::filled(24, 0).unwrap()];
//! let corpus = Corpus::new(images).unwrap();
//!
//! let config = EvolutionConfig::default()
//!     .with_population_size(20)
//!     .with_generations(10)
//!     .with_seed(42);
//!
//! let result = EvolutionRunner::run(&corpus, &config).unwrap();
//! let rebuilt = fitness::reconstruct(&result.best, &corpus.images()[0]);
//! assert_eq!(rebuilt.side(), 24);
//! ```
//!
//! The algorithm is a stochastic local-search heuristic with a fixed
//! generation budget; it makes no global-optimality guarantee. Fitness
//! evaluation is embarrassingly parallel and fans out over rayon within
//! each generation.

mod codebook;
mod config;
mod corpus;
mod error;
pub mod fitness;
pub mod operators;
mod runner;
pub mod selection;

pub use codebook::{Codebook, Pattern, CODEBOOK_SIZE, PATCH_BITS, PATCH_SIDE};
pub use config::EvolutionConfig;
pub use corpus::{BinaryImage, Corpus};
pub use error::Error;
pub use runner::{EvolutionResult, EvolutionRunner};
