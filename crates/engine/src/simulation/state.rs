use super::events::{EventLog, MutationEvent};
use crate::genome::RepeatArray;

/// Machine state of a mutation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Generations advance normally.
    Active,
    /// Terminal: `step()` is a no-op until the engine is re-initialized.
    Collapsed,
}

/// Current state of one simulation run.
///
/// Created by `initialize()` and mutated only by `step()`. The history only
/// ever grows, and `collapsed` never flips back to false except through
/// re-initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationState {
    pub(crate) generation: u64,
    pub(crate) array: RepeatArray,
    pub(crate) history: EventLog,
    pub(crate) collapsed: bool,
}

impl SimulationState {
    pub(crate) fn new(array: RepeatArray) -> Self {
        Self {
            generation: 0,
            array,
            history: EventLog::new(),
            collapsed: false,
        }
    }

    /// Number of completed generations.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn array(&self) -> &RepeatArray {
        &self.array
    }

    #[inline]
    pub fn history(&self) -> &EventLog {
        &self.history
    }

    #[inline]
    pub fn collapsed(&self) -> bool {
        self.collapsed
    }

    #[inline]
    pub fn machine_state(&self) -> EngineState {
        if self.collapsed {
            EngineState::Collapsed
        } else {
            EngineState::Active
        }
    }

    /// Current array size in units.
    #[inline]
    pub fn size(&self) -> usize {
        self.array.unit_count()
    }

    /// Every unit rendered as a string, in array order.
    pub fn repeats(&self) -> Vec<String> {
        self.array.units().iter().map(|u| u.to_string()).collect()
    }

    pub(crate) fn record(&mut self, event: MutationEvent) -> &MutationEvent {
        self.history.push(event);
        // Just pushed, so the log is non-empty
        &self.history.as_slice()[self.history.len() - 1]
    }
}
