//! Simulation parameters and configuration.
//!
//! [`SimulationParams`] is a plain serde-backed value. Missing fields in a
//! JSON document fall back to the defaults below, which describe a 10 000
//! unit CEN178 array.

use crate::base::Unit;
use crate::errors::ConfigError;
use crate::evolution::{CountDistribution, SizeDistribution};
use serde::{Deserialize, Serialize};

/// The 178 bp CEN178 centromeric monomer used as the default seed unit.
pub const DEFAULT_MONOMER: &str = "AGTATAAGAACTTAAACCGCAACCCGATCTTAAAAGCCTAAGTAGTGTTTCCTTGTTAGAAGACACAAAGCCAAAGACTCATATGGACTTTGGCTACACCATGAAAGCTTTGAGAAGCAAGAAGAAGGTTGGTTAGTGTTTTGGAGTCGAATATGACTTGATGTCATGTGTATGATTG";

/// Pull toward a preferred array size.
///
/// The duplication probability becomes
/// `clamp(dup_bias - elasticity * (size - target) / target, 0.1, 0.9)`,
/// so an oversized array deletes more often and an undersized one
/// duplicates more often.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElasticBounding {
    /// Preferred number of units. Must be > 0.
    pub target_size: usize,
    /// Strength of the pull; 0 disables it.
    pub elasticity: f64,
}

/// Parameters controlling one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Mean SNPs per generation
    pub snp_rate: f64,
    /// Mean structural events per generation
    pub indel_rate: f64,
    /// Mean structural event size in units (floored at 1)
    pub indel_size_lambda: f64,
    /// Collapse threshold, and the deletion floor when bounding is enabled
    pub min_array_size: usize,
    /// Duplication ceiling when bounding is enabled
    pub max_array_size: usize,
    /// Reject structural events that would leave `[min, max]`
    pub bounding_enabled: bool,
    /// Number of units at initialization
    pub initial_size: usize,
    /// Content of every unit at initialization
    pub initial_monomer: String,
    /// Rejected structural attempts in a row before the array is declared collapsed
    pub max_consecutive_failures: usize,
    /// Probability that a structural attempt is a duplication
    pub dup_bias: f64,
    /// Optional size-restoring bias on the duplication probability
    pub elastic: Option<ElasticBounding>,
    /// Distribution of SNP and structural event counts
    pub count_distribution: CountDistribution,
    /// Distribution of structural event sizes
    pub size_distribution: SizeDistribution,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            snp_rate: 0.1,
            indel_rate: 0.5,
            indel_size_lambda: 7.6,
            min_array_size: 300,
            max_array_size: 50_000,
            bounding_enabled: true,
            initial_size: 10_000,
            initial_monomer: DEFAULT_MONOMER.to_string(),
            max_consecutive_failures: 5_000,
            dup_bias: 0.5,
            elastic: None,
            count_distribution: CountDistribution::Poisson,
            size_distribution: SizeDistribution::Poisson,
        }
    }
}

impl SimulationParams {
    /// Parse parameters from JSON; absent fields take their defaults.
    ///
    /// The result is validated before it is returned.
    ///
    /// ```rust
    /// # use censim_engine::simulation::SimulationParams;
    /// let params = SimulationParams::from_json(r#"{"initial_size": 500, "snp_rate": 0.0}"#).unwrap();
    /// assert_eq!(params.initial_size, 500);
    /// assert_eq!(params.min_array_size, 300);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse the initial monomer into a unit.
    pub fn monomer(&self) -> Result<Unit, ConfigError> {
        Unit::new(&self.initial_monomer)
    }

    /// Check every parameter, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate("snp_rate", self.snp_rate)?;
        check_rate("indel_rate", self.indel_rate)?;
        check_rate("indel_size_lambda", self.indel_size_lambda)?;

        if self.initial_size == 0 {
            return Err(ConfigError::NonPositive("initial_size"));
        }
        if self.max_consecutive_failures == 0 {
            return Err(ConfigError::NonPositive("max_consecutive_failures"));
        }
        if self.min_array_size > self.max_array_size {
            return Err(ConfigError::InvertedBounds {
                min: self.min_array_size,
                max: self.max_array_size,
            });
        }
        if self.bounding_enabled
            && !(self.min_array_size..=self.max_array_size).contains(&self.initial_size)
        {
            return Err(ConfigError::InitialSizeOutOfBounds {
                size: self.initial_size,
                min: self.min_array_size,
                max: self.max_array_size,
            });
        }
        self.monomer()?;

        if !(0.0..=1.0).contains(&self.dup_bias) {
            return Err(ConfigError::InvalidRate {
                name: "dup_bias",
                value: self.dup_bias,
            });
        }
        if let Some(elastic) = self.elastic {
            if elastic.target_size == 0 {
                return Err(ConfigError::NonPositive("elastic.target_size"));
            }
            check_rate("elastic.elasticity", elastic.elasticity)?;
        }
        if let CountDistribution::NegativeBinomial { dispersion } = self.count_distribution {
            check_positive("count_distribution.dispersion", dispersion)?;
        }
        if let SizeDistribution::PowerLaw { alpha } = self.size_distribution {
            check_positive("size_distribution.alpha", alpha)?;
        }
        Ok(())
    }

    /// Probability that the next structural attempt is a duplication, given
    /// the current array size.
    pub fn duplication_probability(&self, unit_count: usize) -> f64 {
        match self.elastic {
            Some(ElasticBounding { target_size, elasticity }) if elasticity > 0.0 && target_size > 0 => {
                let deviation = (unit_count as f64 - target_size as f64) / target_size as f64;
                (self.dup_bias - elasticity * deviation).clamp(0.1, 0.9)
            }
            _ => self.dup_bias,
        }
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { name, value })
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { name, value })
    }
}
