//! Synchronous listeners for live updates.
//!
//! Observers run on the thread driving `step()`, in order: `on_mutation`
//! once per accepted event at the moment it is accepted, then
//! `on_generation` once after the generation is complete. An error from
//! either hook aborts the step and is returned to the caller.
//!
//! Observers receive read-only views and cannot mutate the engine.

use super::events::MutationEvent;
use super::state::SimulationState;
use crate::errors::ObserverError;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, trace};

/// Listener registered on a [`MutationEngine`](super::MutationEngine).
///
/// Both hooks default to doing nothing, so implementors only override what
/// they need.
pub trait MutationObserver: Send {
    fn on_mutation(&mut self, _event: &MutationEvent) -> Result<(), ObserverError> {
        Ok(())
    }

    fn on_generation(&mut self, _state: &SimulationState) -> Result<(), ObserverError> {
        Ok(())
    }
}

/// Emits accepted events and periodic generation summaries through `tracing`.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    every: u64,
}

impl TracingObserver {
    /// Summarize every `every` generations (at least 1).
    pub fn new(every: u64) -> Self {
        Self { every: every.max(1) }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(100)
    }
}

impl MutationObserver for TracingObserver {
    fn on_mutation(&mut self, event: &MutationEvent) -> Result<(), ObserverError> {
        trace!(
            generation = event.generation,
            kind = %event.kind,
            position = event.position,
            size = event.size,
            details = %event.details,
            "mutation accepted"
        );
        Ok(())
    }

    fn on_generation(&mut self, state: &SimulationState) -> Result<(), ObserverError> {
        if state.generation() % self.every == 0 || state.collapsed() {
            debug!(
                generation = state.generation(),
                array_size = state.size(),
                events = state.history().len(),
                collapsed = state.collapsed(),
                "generation complete"
            );
        }
        Ok(())
    }
}

/// Queue of emitted events that the caller drains between steps.
///
/// Clones share one buffer: register one clone on the engine and keep
/// another to call [`drain`](Self::drain).
#[derive(Debug, Clone, Default)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<MutationEvent>>>,
    generations: Arc<Mutex<Vec<u64>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all events collected since the last drain.
    pub fn drain(&self) -> Vec<MutationEvent> {
        std::mem::take(&mut *lock(&self.events))
    }

    /// Take the generation numbers completed since the last drain.
    pub fn drain_generations(&self) -> Vec<u64> {
        std::mem::take(&mut *lock(&self.generations))
    }

    /// Number of events waiting to be drained.
    pub fn pending(&self) -> usize {
        lock(&self.events).len()
    }
}

impl MutationObserver for EventCollector {
    fn on_mutation(&mut self, event: &MutationEvent) -> Result<(), ObserverError> {
        lock(&self.events).push(event.clone());
        Ok(())
    }

    fn on_generation(&mut self, state: &SimulationState) -> Result<(), ObserverError> {
        lock(&self.generations).push(state.generation());
        Ok(())
    }
}

// A panic while holding the lock cannot leave a Vec half-written.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::events::MutationKind;

    #[test]
    fn test_collector_clones_share_buffer() {
        let collector = EventCollector::new();
        let mut registered = collector.clone();

        registered.on_mutation(&MutationEvent::snp(1, 5, 'A', 'T')).unwrap();
        registered.on_mutation(&MutationEvent::deletion(1, 0, 3)).unwrap();
        assert_eq!(collector.pending(), 2);

        let drained = collector.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].kind, MutationKind::Deletion);
        assert_eq!(collector.pending(), 0);
        assert!(collector.drain().is_empty());
    }

    #[test]
    fn test_default_hooks_are_noops() {
        struct Silent;
        impl MutationObserver for Silent {}

        let mut silent = Silent;
        assert!(silent.on_mutation(&MutationEvent::snp(1, 0, 'C', 'G')).is_ok());
    }

    #[test]
    fn test_tracing_observer_cadence_floor() {
        let observer = TracingObserver::new(0);
        assert_eq!(observer.every, 1);
    }
}
