//! Evolutionary processes.
//!
//! - **Sampling**: event counts, event sizes, positions and replacement bases
//!   drawn from one seeded generator.

pub mod sampler;

pub use sampler::{CountDistribution, MutationSampler, SizeDistribution};
