//! # Engine Crate
//!
//! The `engine` crate simulates the structural evolution of a single
//! centromeric tandem repeat array. Starting from identical copies of a seed
//! monomer, each generation applies random point substitutions and random
//! duplications and deletions of contiguous unit ranges, optionally bounded
//! to a size window. Runs are reproducible from their seed.
//!
//! ```
//! use censim_engine::prelude::*;
//!
//! let mut engine = SimulationBuilder::new()
//!     .initial_size(500)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! engine.run(100).unwrap();
//! println!("{}", engine.get_statistics());
//! ```

pub mod base;
pub mod errors;
pub mod evolution;
pub mod genome;
pub mod prelude;
pub mod simulation;

pub use base::{Nucleotide, Unit};
