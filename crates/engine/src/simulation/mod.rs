//! Mutation engine, its state and its outputs.
//!
//! The most commonly used types are re-exported here so consumers can import
//! them from `censim_engine::simulation`.
//!
//! - `MutationEngine`: the per-generation state machine that applies SNPs,
//!   duplications and deletions to one array.
//! - `SimulationBuilder`: fluent builder for constructing engines with
//!   defaults and validation.
//! - `SimulationParams`: serde-backed configuration.
//! - `Statistics`: summary snapshot of a state.

pub mod builder;
pub mod engine;
pub mod events;
pub mod observer;
pub mod parameters;
pub mod state;
pub mod statistics;

pub use builder::SimulationBuilder;
pub use engine::MutationEngine;
pub use events::{EventLog, MutationEvent, MutationKind};
pub use observer::{EventCollector, MutationObserver, TracingObserver};
pub use parameters::{ElasticBounding, SimulationParams, DEFAULT_MONOMER};
pub use state::{EngineState, SimulationState};
pub use statistics::Statistics;
