//! Run configuration.
//!
//! [`EvolutionConfig`] holds every knob of the generational loop. All
//! parameters have defaults; construction is infallible and [`validate`]
//! (called by the runner before any state is built) rejects impossible
//! combinations with a typed error.
//!
//! [`validate`]: EvolutionConfig::validate

use crate::error::Error;

/// Configuration for one evolutionary run.
///
/// # Builder Pattern
///
/// ```
/// use patchbook::EvolutionConfig;
///
/// let config = EvolutionConfig::default()
///     .with_population_size(100)
///     .with_mutation_rate(0.1)
///     .with_elite_count(3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EvolutionConfig {
    /// Number of codebooks in the population. Constant across generations.
    pub population_size: usize,

    /// Number of generations to run. The loop always runs the full budget.
    pub generations: usize,

    /// Mutation rate in `[0, 1]`.
    ///
    /// Doubles as per-pattern mutation probability and per-pattern
    /// intensity; see [`operators::mutate`](crate::operators::mutate).
    pub mutation_rate: f64,

    /// Number of top codebooks copied unchanged into each next generation.
    ///
    /// With at least one elite the per-generation best loss is
    /// non-increasing.
    pub elite_count: usize,

    /// Individuals drawn (without replacement) per tournament round.
    pub tournament_size: usize,

    /// Whether to evaluate the population in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.05,
            elite_count: 1,
            tournament_size: 3,
            parallel: true,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation budget.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the mutation rate, clamped to `[0, 1]`.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the elite count.
    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), Error> {
        if self.population_size < 1 {
            return Err(Error::Config("population_size must be at least 1".into()));
        }
        if self.generations < 1 {
            return Err(Error::Config("generations must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::Config(format!(
                "mutation_rate {} is outside [0, 1]",
                self.mutation_rate
            )));
        }
        if self.elite_count > self.population_size {
            return Err(Error::Config(format!(
                "elite_count {} exceeds population_size {}",
                self.elite_count, self.population_size
            )));
        }
        if self.tournament_size < 1 {
            return Err(Error::Config("tournament_size must be at least 1".into()));
        }
        if self.tournament_size > self.population_size {
            return Err(Error::Config(format!(
                "tournament_size {} exceeds population_size {}",
                self.tournament_size, self.population_size
            )));
        }
        // Offspring construction samples two distinct parents, so a
        // population this small must be filled entirely by elites.
        if self.population_size < 2 && self.elite_count < self.population_size {
            return Err(Error::Config(
                "population_size 1 requires elite_count 1: offspring need two distinct parents"
                    .into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvolutionConfig::default();
        assert_eq!(config.population_size, 50);
        assert_eq!(config.generations, 100);
        assert!((config.mutation_rate - 0.05).abs() < 1e-12);
        assert_eq!(config.elite_count, 1);
        assert_eq!(config.tournament_size, 3);
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let config = EvolutionConfig::default()
            .with_population_size(200)
            .with_generations(10)
            .with_mutation_rate(0.2)
            .with_elite_count(5)
            .with_tournament_size(4)
            .with_parallel(false)
            .with_seed(42);
        assert_eq!(config.population_size, 200);
        assert_eq!(config.generations, 10);
        assert!((config.mutation_rate - 0.2).abs() < 1e-12);
        assert_eq!(config.elite_count, 5);
        assert_eq!(config.tournament_size, 4);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_mutation_rate_is_clamped() {
        assert_eq!(
            EvolutionConfig::default().with_mutation_rate(1.5).mutation_rate,
            1.0
        );
        assert_eq!(
            EvolutionConfig::default().with_mutation_rate(-0.5).mutation_rate,
            0.0
        );
    }

    #[test]
    fn test_validate_rejects_zero_population() {
        let config = EvolutionConfig::default().with_population_size(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_generations() {
        let config = EvolutionConfig::default().with_generations(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_excess_elites() {
        let config = EvolutionConfig::default()
            .with_population_size(10)
            .with_elite_count(11);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_tournament() {
        let config = EvolutionConfig::default()
            .with_population_size(10)
            .with_tournament_size(11);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_out_of_range_rate() {
        // Direct struct mutation bypasses the clamping builder.
        let mut config = EvolutionConfig::default();
        config.mutation_rate = 1.5;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_singleton_population_needs_full_elitism() {
        let ok = EvolutionConfig::default()
            .with_population_size(1)
            .with_elite_count(1)
            .with_tournament_size(1);
        assert!(ok.validate().is_ok());

        let err = EvolutionConfig::default()
            .with_population_size(1)
            .with_elite_count(0)
            .with_tournament_size(1);
        assert!(matches!(err.validate(), Err(Error::Config(_))));
    }
}
