//! Builder pattern for creating mutation engines.
//!
//! Starts from [`SimulationParams::default`] and validates everything once,
//! in [`SimulationBuilder::build`].

use super::engine::MutationEngine;
use super::observer::MutationObserver;
use super::parameters::{ElasticBounding, SimulationParams};
use crate::errors::ConfigError;
use crate::evolution::{CountDistribution, SizeDistribution};
use rand::Rng;
use tracing::debug;

/// Builder for constructing [`MutationEngine`] instances with a fluent API.
///
/// # Examples
///
/// ```
/// use censim_engine::simulation::SimulationBuilder;
///
/// let mut engine = SimulationBuilder::new()
///     .monomer("ACGTTGCA")
///     .initial_size(100)
///     .array_bounds(20, 1_000)
///     .snp_rate(1.0)
///     .indel_rate(0.5)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// engine.run(50).unwrap();
/// assert_eq!(engine.array().repeat_size(), 8);
/// ```
pub struct SimulationBuilder {
    params: SimulationParams,
    seed: Option<u64>, // Default: None (random)
    observers: Vec<Box<dyn MutationObserver>>,
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationBuilder {
    /// Create a builder holding the default parameters.
    pub fn new() -> Self {
        Self {
            params: SimulationParams::default(),
            seed: None,
            observers: Vec::new(),
        }
    }

    /// Replace every parameter at once, e.g. with values loaded from JSON.
    pub fn params(mut self, params: SimulationParams) -> Self {
        self.params = params;
        self
    }

    /// Set the random seed for reproducibility (default: None = random).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn snp_rate(mut self, rate: f64) -> Self {
        self.params.snp_rate = rate;
        self
    }

    pub fn indel_rate(mut self, rate: f64) -> Self {
        self.params.indel_rate = rate;
        self
    }

    /// Mean structural event size in units.
    pub fn indel_size_lambda(mut self, lambda: f64) -> Self {
        self.params.indel_size_lambda = lambda;
        self
    }

    /// Set the `[min, max]` array size bounds in units.
    pub fn array_bounds(mut self, min: usize, max: usize) -> Self {
        self.params.min_array_size = min;
        self.params.max_array_size = max;
        self
    }

    /// Enable or disable rejection of events that would leave the bounds.
    pub fn bounding(mut self, enabled: bool) -> Self {
        self.params.bounding_enabled = enabled;
        self
    }

    pub fn initial_size(mut self, size: usize) -> Self {
        self.params.initial_size = size;
        self
    }

    /// Set the seed unit content. Validated by [`build`](Self::build).
    pub fn monomer(mut self, monomer: impl Into<String>) -> Self {
        self.params.initial_monomer = monomer.into();
        self
    }

    pub fn max_consecutive_failures(mut self, failures: usize) -> Self {
        self.params.max_consecutive_failures = failures;
        self
    }

    /// Probability that a structural attempt is a duplication (default 0.5).
    pub fn dup_bias(mut self, bias: f64) -> Self {
        self.params.dup_bias = bias;
        self
    }

    /// Bias duplications toward `target_size` with strength `elasticity`.
    pub fn elastic(mut self, target_size: usize, elasticity: f64) -> Self {
        self.params.elastic = Some(ElasticBounding {
            target_size,
            elasticity,
        });
        self
    }

    pub fn count_distribution(mut self, distribution: CountDistribution) -> Self {
        self.params.count_distribution = distribution;
        self
    }

    pub fn size_distribution(mut self, distribution: SizeDistribution) -> Self {
        self.params.size_distribution = distribution;
        self
    }

    /// Register an observer on the engine being built.
    pub fn observer<O: MutationObserver + 'static>(mut self, observer: O) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Validate the parameters and create an initialized engine.
    pub fn build(self) -> Result<MutationEngine, ConfigError> {
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        if self.seed.is_none() {
            debug!(seed, "no seed given, drew one from the thread rng");
        }

        let mut engine = MutationEngine::new(self.params, seed)?;
        for observer in self.observers {
            engine.add_boxed_observer(observer);
        }
        Ok(engine)
    }
}
