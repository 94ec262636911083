//! The generational loop.
//!
//! [`EvolutionRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → elitism → selection → crossover →
//! mutation → repeat, for a fixed generation budget.
//!
//! The loop itself is strictly sequential; within a generation, fitness
//! evaluation fans out over rayon workers and joins at a single barrier
//! before any result is acted on. The corpus is shared read-only, the
//! population is touched only by the orchestrating thread, and the RNG
//! never leaves the orchestrating thread — a seeded run produces identical
//! results whether evaluation is parallel or sequential. All run state is
//! local to one call, so independent runs (e.g. a hyperparameter sweep)
//! never interfere.

use crate::codebook::Codebook;
use crate::config::EvolutionConfig;
use crate::corpus::Corpus;
use crate::error::Error;
use crate::{fitness, operators, selection};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of one evolutionary run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// The best codebook of the final completed generation.
    ///
    /// Best-so-far is overwritten each generation rather than kept as a
    /// running maximum; with `elite_count >= 1` the two coincide because
    /// elites make the per-generation best loss non-increasing. With
    /// `elite_count = 0` the loss history may fluctuate and this is simply
    /// the last generation's winner.
    pub best: Codebook,

    /// Mean percentage reconstruction loss of `best` over the corpus.
    pub best_loss: f64,

    /// Number of completed generations.
    pub generations: usize,

    /// Whether the run was cancelled before exhausting its budget.
    pub cancelled: bool,

    /// Best loss of each completed generation, in percent.
    pub loss_history: Vec<f64>,
}

/// Executes the evolutionary loop.
///
/// # Usage
///
/// ```
/// use patchbook::{BinaryImage, Corpus, EvolutionConfig, EvolutionRunner};
///
/// let corpus = Corpus::new(vec![BinaryImage::filled(24, 1).unwrap()]).unwrap();
/// let config = EvolutionConfig::default().with_generations(5).with_seed(42);
/// let result = EvolutionRunner::run(&corpus, &config).unwrap();
/// assert_eq!(result.loss_history.len(), 5);
/// ```
pub struct EvolutionRunner;

impl EvolutionRunner {
    /// Runs the optimization to its full generation budget.
    pub fn run(corpus: &Corpus, config: &EvolutionConfig) -> Result<EvolutionResult, Error> {
        Self::run_with_cancel(corpus, config, None)
    }

    /// Runs the optimization with an optional cancellation token.
    ///
    /// The flag is checked only at generation boundaries: the in-flight
    /// generation always runs to completion, so a cancelled run still
    /// returns at least one completed generation and a consistent history.
    pub fn run_with_cancel(
        corpus: &Corpus,
        config: &EvolutionConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EvolutionResult, Error> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        // 1. Initialize population
        let mut population: Vec<Codebook> = (0..config.population_size)
            .map(|_| Codebook::random(&mut rng))
            .collect();

        let mut best: Option<Codebook> = None;
        let mut loss_history = Vec::with_capacity(config.generations);
        let mut cancelled = false;
        let mut generation = 0usize;

        loop {
            // 2. Evaluate the population (parallel fan-out, one barrier)
            let scores = evaluate_population(&population, corpus, config.parallel)?;

            // 3. Record this generation's best. The overwrite is
            //    unconditional; elitism keeps the loss sequence
            //    non-increasing when elite_count >= 1.
            let best_idx = best_index(&scores);
            best = Some(population[best_idx].clone());
            loss_history.push(-scores[best_idx]);
            log::debug!(
                "generation {}/{}: best loss {:.2}%",
                generation + 1,
                config.generations,
                -scores[best_idx]
            );

            // 4. Build the next generation
            let mut next: Vec<Codebook> = Vec::with_capacity(config.population_size);

            // 4a. Elites, in ascending-score order of the top slice
            if config.elite_count > 0 {
                let mut order: Vec<usize> = (0..population.len()).collect();
                order.sort_by(|&a, &b| {
                    scores[a]
                        .partial_cmp(&scores[b])
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                for &idx in &order[population.len() - config.elite_count..] {
                    next.push(population[idx].clone());
                }
            }

            // 4b. Offspring: two distinct parents from the tournament pool,
            //     crossover, then mutation
            if next.len() < config.population_size {
                let parents =
                    selection::select_parents(&scores, config.tournament_size, &mut rng);
                while next.len() < config.population_size {
                    let picks = index::sample(&mut rng, parents.len(), 2);
                    let (i, j) = (parents[picks.index(0)], parents[picks.index(1)]);
                    let mut child = operators::crossover(&population[i], &population[j], &mut rng);
                    operators::mutate(&mut child, config.mutation_rate, &mut rng);
                    next.push(child);
                }
            }

            population = next;
            generation += 1;

            if generation >= config.generations {
                break;
            }
            // Cancellation is honored only between generations.
            if let Some(flag) = &cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
        }

        let best = best.expect("at least one generation completes");
        let best_loss = *loss_history
            .last()
            .expect("one history entry per completed generation");
        log::info!(
            "finished after {generation} generation(s): best loss {best_loss:.2}%{}",
            if cancelled { " (cancelled)" } else { "" }
        );

        Ok(EvolutionResult {
            best,
            best_loss,
            generations: generation,
            cancelled,
            loss_history,
        })
    }
}

/// Scores every codebook against the corpus.
///
/// Evaluation is a pure function per codebook, so the parallel branch needs
/// no synchronization; a failed evaluation aborts the whole generation.
fn evaluate_population(
    population: &[Codebook],
    corpus: &Corpus,
    parallel: bool,
) -> Result<Vec<f64>, Error> {
    if parallel {
        population
            .par_iter()
            .map(|book| fitness::evaluate(book, corpus.images()))
            .collect()
    } else {
        population
            .iter()
            .map(|book| fitness::evaluate(book, corpus.images()))
            .collect()
    }
}

/// Index of the maximum score; ties go to the lowest index.
fn best_index(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = i;
        }
    }
    best
}
