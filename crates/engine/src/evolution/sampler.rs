//! Random draws behind every mutation decision.
//!
//! A [`MutationSampler`] owns the single seeded generator of an engine. All
//! event counts, event sizes, positions and replacement bases come from it,
//! in a fixed order, which is what makes a run reproducible from its seed.
//!
//! ## Event counts
//! The number of SNPs and of structural events per generation are drawn from
//! a [`CountDistribution`]. Poisson is the standard model for rare,
//! independent events. The negative binomial (a Gamma-Poisson mixture) keeps
//! the same mean but adds overdispersion, producing bursty generations.
//!
//! ## Event sizes
//! Structural events span a whole number of units drawn from a
//! [`SizeDistribution`], floored at one unit.

use crate::base::Nucleotide;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma, Geometric, Pareto, Poisson};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

/// Distribution of per-generation event counts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CountDistribution {
    /// Poisson with mean = variance = λ.
    #[default]
    Poisson,
    /// Gamma-Poisson mixture with mean λ and variance λ + dispersion·λ².
    NegativeBinomial {
        /// Higher values mean more overdispersion. Must be > 0.
        dispersion: f64,
    },
}

/// Distribution of structural event sizes, in units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SizeDistribution {
    /// Poisson with mean λ, symmetric around the mean for large λ.
    #[default]
    Poisson,
    /// Geometric with mean λ; small events dominate.
    Geometric,
    /// Discretized Pareto (scale 1); rare very large events. λ is ignored.
    PowerLaw {
        /// Tail exponent. Lower values mean heavier tails. Must be > 0.
        alpha: f64,
    },
}

/// Seeded source of every random decision made by a mutation engine.
#[derive(Debug, Clone)]
pub struct MutationSampler {
    seed: u64,
    rng: Xoshiro256PlusPlus,
}

impl MutationSampler {
    /// Create a sampler whose stream is fully determined by `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Seed this sampler was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of events for one generation with mean `lambda`.
    ///
    /// Non-positive or non-finite means yield zero events without consuming
    /// randomness.
    pub fn event_count(&mut self, lambda: f64, distribution: CountDistribution) -> usize {
        match distribution {
            CountDistribution::Poisson => sample_poisson(&mut self.rng, lambda),
            CountDistribution::NegativeBinomial { dispersion } => {
                if !is_positive(lambda) || !is_positive(dispersion) {
                    return sample_poisson(&mut self.rng, lambda);
                }
                // Gamma(shape = 1/d, scale = λd) has mean λ
                match Gamma::new(1.0 / dispersion, lambda * dispersion) {
                    Ok(gamma) => {
                        let rate = gamma.sample(&mut self.rng);
                        sample_poisson(&mut self.rng, rate)
                    }
                    Err(_) => 0,
                }
            }
        }
    }

    /// Size of one structural event in units; always at least 1.
    pub fn event_size(&mut self, lambda: f64, distribution: SizeDistribution) -> usize {
        let size = match distribution {
            SizeDistribution::Poisson => sample_poisson(&mut self.rng, lambda),
            SizeDistribution::Geometric => {
                // Failures before first success has mean (1 - p) / p = λ
                let p = 1.0 / (1.0 + lambda.max(0.0));
                match Geometric::new(p) {
                    Ok(geo) => usize::try_from(geo.sample(&mut self.rng)).unwrap_or(usize::MAX),
                    Err(_) => 1,
                }
            }
            SizeDistribution::PowerLaw { alpha } => match Pareto::new(1.0, alpha) {
                // Float-to-int `as` saturates, so huge tail draws clamp to usize::MAX
                Ok(pareto) => pareto.sample(&mut self.rng).floor() as usize,
                Err(_) => 1,
            },
        };
        size.max(1)
    }

    /// Uniform index in `[0, upper)`. Returns 0 without drawing if `upper` is 0.
    #[inline]
    pub fn index(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        self.rng.random_range(0..upper)
    }

    /// Pick a replacement base uniformly among the three that differ from `old`.
    #[inline]
    pub fn substitute(&mut self, old: Nucleotide) -> Nucleotide {
        old.others()[self.rng.random_range(0..3)]
    }

    /// Decide whether a structural attempt is a duplication (`true`) or a
    /// deletion, duplicating with probability `dup_prob`.
    #[inline]
    pub fn is_duplication(&mut self, dup_prob: f64) -> bool {
        let p = if dup_prob.is_nan() { 0.5 } else { dup_prob.clamp(0.0, 1.0) };
        self.rng.random_bool(p)
    }
}

#[inline]
fn is_positive(x: f64) -> bool {
    x > 0.0 && x.is_finite()
}

fn sample_poisson<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> usize {
    if !is_positive(lambda) {
        return 0;
    }
    match Poisson::new(lambda) {
        Ok(poisson) => poisson.sample(rng) as usize,
        Err(_) => 0,
    }
}
