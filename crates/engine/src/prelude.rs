//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use censim_engine::prelude::*;
//!
//! let array = RepeatArray::from_monomer("ACGT", 3).unwrap();
//! assert_eq!(array.bp_length(), 12);
//! ```

pub use crate::base::{Nucleotide, Unit};
pub use crate::errors::{ArrayError, ConfigError, IndexOutOfRange, ObserverError, SimulationError};
pub use crate::evolution::{CountDistribution, MutationSampler, SizeDistribution};
pub use crate::genome::RepeatArray;
pub use crate::simulation::{
    EngineState, EventCollector, MutationEngine, MutationEvent, MutationKind, MutationObserver,
    SimulationBuilder, SimulationParams, SimulationState, Statistics, TracingObserver,
};
