//! Error types shared across the crate.
//!
//! Array collapse is a simulation outcome, not an error, and never shows up
//! here. See [`crate::simulation::SimulationState::collapsed`].

use thiserror::Error;

/// Error raised by observers registered on a
/// [`MutationEngine`](crate::simulation::MutationEngine).
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// Invalid construction parameters or arguments.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The seed monomer has no bases.
    #[error("Monomer must not be empty")]
    EmptyMonomer,

    /// A character outside the A/C/G/T alphabet was supplied.
    #[error("Invalid base '{found}' at position {position}")]
    InvalidBase { found: char, position: usize },

    /// A count or size that must be strictly positive was zero.
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),

    /// A rate or distribution parameter was negative, NaN, or otherwise out of range.
    #[error("Invalid value for {name}: {value}")]
    InvalidRate { name: &'static str, value: f64 },

    /// `min_array_size` exceeds `max_array_size`.
    #[error("min_array_size ({min}) exceeds max_array_size ({max})")]
    InvertedBounds { min: usize, max: usize },

    /// The initial array would already violate the enforced bounds.
    #[error("initial_size {size} outside bounds [{min}, {max}]")]
    InitialSizeOutOfBounds { size: usize, min: usize, max: usize },

    /// A structural edit was requested over an empty unit range.
    #[error("Empty unit range [{start}, {end})")]
    EmptyRange { start: usize, end: usize },

    /// A unit does not have the array's repeat size.
    #[error("Unit length mismatch: expected {expected}, found {found}")]
    UnitLengthMismatch { expected: usize, found: usize },

    /// A flat sequence does not split evenly into units.
    #[error("Sequence length {len} is not a multiple of repeat size {repeat_size}")]
    RaggedSequence { len: usize, repeat_size: usize },

    /// A configuration document could not be parsed.
    #[error("Failed to parse parameters: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

/// Error returned when an index is outside the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Index {index} out of range (len = {len})")]
pub struct IndexOutOfRange {
    /// The index that was requested
    pub index: usize,

    /// The current length (exclusive upper bound)
    pub len: usize,
}

/// Errors from structural edits on a [`RepeatArray`](crate::genome::RepeatArray).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArrayError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    IndexOutOfRange(#[from] IndexOutOfRange),
}

/// Errors surfaced by `step()` and `run()`.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal accessor misuse. Reaching this from `step()` is a defect.
    #[error(transparent)]
    IndexOutOfRange(#[from] IndexOutOfRange),

    /// An observer hook failed; the run is aborted.
    #[error("Observer failed: {0}")]
    Observer(#[source] ObserverError),
}

impl From<ArrayError> for SimulationError {
    fn from(e: ArrayError) -> Self {
        match e {
            ArrayError::Config(e) => Self::Config(e),
            ArrayError::IndexOutOfRange(e) => Self::IndexOutOfRange(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_range_display() {
        let err = IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "Index 7 out of range (len = 3)");
    }

    #[test]
    fn test_array_error_into_simulation_error() {
        let err: SimulationError = ArrayError::from(ConfigError::EmptyRange { start: 2, end: 2 }).into();
        assert!(matches!(err, SimulationError::Config(ConfigError::EmptyRange { .. })));

        let err: SimulationError = ArrayError::from(IndexOutOfRange { index: 5, len: 4 }).into();
        assert!(matches!(err, SimulationError::IndexOutOfRange(_)));
    }

    #[test]
    fn test_observer_error_keeps_source() {
        use std::error::Error;

        let err = SimulationError::Observer("listener exploded".into());
        assert!(err.to_string().contains("listener exploded"));
        assert!(err.source().is_some());
    }
}
