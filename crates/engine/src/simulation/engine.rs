//! Generation state machine for a single repeat array.
//!
//! Each call to [`MutationEngine::step`] runs one generation, in a fixed order:
//!
//! 1. **SNP phase**: draw the SNP count, then for each SNP pick a base-pair
//!    position and replace the base with one of the three other bases.
//! 2. **Structural phase**: draw the number of duplications/deletions to
//!    accept. Each attempt draws a kind, a size and a start unit. Attempts
//!    that run past the end of the array or would cross an enforced bound are
//!    rejected and retried with fresh draws. Too many rejections in a row
//!    collapse the array and abandon the rest of the generation.
//! 3. **Bound check**: an array smaller than `min_array_size` collapses.
//! 4. **Notification**: per-event observers run as each event is accepted,
//!    the per-generation observers run once at the end.
//!
//! Every random decision comes from the engine's own [`MutationSampler`], so
//! the same seed, parameters and call sequence always produce the same history.

use super::events::MutationEvent;
use super::observer::MutationObserver;
use super::parameters::SimulationParams;
use super::state::{EngineState, SimulationState};
use super::statistics::Statistics;
use crate::base::Unit;
use crate::errors::{ConfigError, SimulationError};
use crate::evolution::MutationSampler;
use crate::genome::RepeatArray;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, trace};

/// Drives the evolution of one repeat array.
///
/// The engine exclusively owns its array, state and random stream.
/// Independent runs (e.g. parallel replicates) each need their own engine.
///
/// # Examples
///
/// ```rust
/// # use censim_engine::simulation::{MutationEngine, SimulationParams};
/// let params = SimulationParams {
///     initial_size: 500,
///     ..Default::default()
/// };
/// let mut engine = MutationEngine::new(params, 42).unwrap();
/// engine.run(100).unwrap();
///
/// let stats = engine.get_statistics();
/// assert!(stats.generation <= 100);
/// assert!(stats.array_size >= 300);
/// ```
pub struct MutationEngine {
    params: SimulationParams,
    sampler: MutationSampler,
    state: SimulationState,
    observers: Vec<Box<dyn MutationObserver>>,
}

impl MutationEngine {
    /// Validate `params`, seed the random stream and initialize the array.
    pub fn new(params: SimulationParams, seed: u64) -> Result<Self, ConfigError> {
        let state = SimulationState::new(build_array(&params)?);
        debug!(
            seed,
            initial_size = params.initial_size,
            repeat_size = state.array().repeat_size(),
            "mutation engine created"
        );

        Ok(Self {
            params,
            sampler: MutationSampler::from_seed(seed),
            state,
            observers: Vec::new(),
        })
    }

    /// (Re)build the array from the current parameters.
    ///
    /// Resets the generation counter, history and collapse flag. The random
    /// stream continues where it was; it is not reseeded.
    pub fn initialize(&mut self) -> Result<(), ConfigError> {
        self.state = SimulationState::new(build_array(&self.params)?);
        debug!(initial_size = self.params.initial_size, "mutation engine initialized");
        Ok(())
    }

    /// Replace the parameters without touching the current array.
    ///
    /// Takes effect from the next `step()`. Invalid parameters are rejected
    /// and the old ones kept.
    pub fn set_params(&mut self, params: SimulationParams) -> Result<(), ConfigError> {
        params.validate()?;
        debug!(
            snp_rate = params.snp_rate,
            indel_rate = params.indel_rate,
            indel_size_lambda = params.indel_size_lambda,
            bounding_enabled = params.bounding_enabled,
            "parameters replaced"
        );
        self.params = params;
        Ok(())
    }

    /// Register a listener. Observers are notified in registration order.
    pub fn add_observer<O: MutationObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    pub(crate) fn add_boxed_observer(&mut self, observer: Box<dyn MutationObserver>) {
        self.observers.push(observer);
    }

    /// Remove all registered listeners.
    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Seed of the engine's random stream.
    pub fn seed(&self) -> u64 {
        self.sampler.seed()
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn array(&self) -> &RepeatArray {
        self.state.array()
    }

    pub fn generation(&self) -> u64 {
        self.state.generation()
    }

    pub fn history(&self) -> &[MutationEvent] {
        self.state.history().as_slice()
    }

    pub fn is_collapsed(&self) -> bool {
        self.state.collapsed()
    }

    pub fn machine_state(&self) -> EngineState {
        self.state.machine_state()
    }

    /// Distinct unit contents currently in the array.
    pub fn unique_units(&self) -> HashSet<&Unit> {
        self.state.array().unique_units()
    }

    /// Summary statistics for the current state.
    pub fn get_statistics(&self) -> Statistics {
        Statistics::from_state(&self.state)
    }

    /// Advance one generation and return the events it produced.
    ///
    /// On a collapsed engine this does nothing and returns no events.
    /// Observer failures abort the generation and are returned as
    /// [`SimulationError::Observer`]; events accepted before the failure stay
    /// in the history.
    pub fn step(&mut self) -> Result<&[MutationEvent], SimulationError> {
        if self.state.collapsed {
            return Ok(&[]);
        }

        let first = self.state.history.len();
        self.state.generation += 1;

        self.apply_snps()?;
        self.apply_indels()?;

        if !self.state.collapsed && self.state.size() < self.params.min_array_size {
            self.collapse("array below minimum size");
        }

        for observer in self.observers.iter_mut() {
            observer
                .on_generation(&self.state)
                .map_err(SimulationError::Observer)?;
        }

        trace!(
            generation = self.state.generation,
            array_size = self.state.size(),
            events = self.state.history.len() - first,
            "generation complete"
        );

        Ok(&self.state.history.as_slice()[first..])
    }

    /// Run up to `generations` steps, stopping early once the array collapses.
    pub fn run(&mut self, generations: u64) -> Result<&SimulationState, SimulationError> {
        for _ in 0..generations {
            if self.state.collapsed {
                break;
            }
            self.step()?;
        }
        Ok(&self.state)
    }

    fn apply_snps(&mut self) -> Result<(), SimulationError> {
        let count = self
            .sampler
            .event_count(self.params.snp_rate, self.params.count_distribution);
        let generation = self.state.generation;

        for _ in 0..count {
            let bp_length = self.state.array.bp_length();
            if bp_length == 0 {
                break;
            }

            let bp_index = self.sampler.index(bp_length);
            let old = self.state.array.base(bp_index)?;
            let new = self.sampler.substitute(old);
            self.state.array.set_base(bp_index, new)?;

            let event = self.state.record(MutationEvent::snp(
                generation,
                bp_index,
                old.to_char(),
                new.to_char(),
            ));
            notify_mutation(&mut self.observers, event)?;
        }
        Ok(())
    }

    fn apply_indels(&mut self) -> Result<(), SimulationError> {
        let requested = self
            .sampler
            .event_count(self.params.indel_rate, self.params.count_distribution);
        let generation = self.state.generation;
        let mut accepted = 0;
        let mut consecutive_failures = 0;

        while accepted < requested {
            let unit_count = self.state.array.unit_count();
            if unit_count == 0 {
                self.collapse("array empty");
                return Ok(());
            }

            let is_dup = self
                .sampler
                .is_duplication(self.params.duplication_probability(unit_count));
            let size = self
                .sampler
                .event_size(self.params.indel_size_lambda, self.params.size_distribution);
            let start = self.sampler.index(unit_count);
            let end = start.saturating_add(size);

            if let Some(reason) = self.rejection(is_dup, unit_count, size, end) {
                consecutive_failures += 1;
                trace!(generation, reason, start, size, consecutive_failures, "structural event rejected");
                if consecutive_failures >= self.params.max_consecutive_failures {
                    self.collapse("failure budget exhausted");
                    return Ok(());
                }
                continue;
            }

            let event = if is_dup {
                self.state.array.duplicate(start, end)?;
                MutationEvent::duplication(generation, start, end)
            } else {
                self.state.array.delete(start, end)?;
                MutationEvent::deletion(generation, start, end)
            };
            consecutive_failures = 0;
            accepted += 1;

            let event = self.state.record(event);
            notify_mutation(&mut self.observers, event)?;
        }
        Ok(())
    }

    /// Why a sampled structural event cannot be applied, if it cannot.
    fn rejection(&self, is_dup: bool, unit_count: usize, size: usize, end: usize) -> Option<&'static str> {
        if end > unit_count {
            return Some("range past end of array");
        }
        if !self.params.bounding_enabled {
            return None;
        }
        // `end <= unit_count` implies `size <= unit_count`, so neither side overflows
        if is_dup && unit_count + size > self.params.max_array_size {
            Some("duplication exceeds max_array_size")
        } else if !is_dup && unit_count - size < self.params.min_array_size {
            Some("deletion below min_array_size")
        } else {
            None
        }
    }

    fn collapse(&mut self, reason: &'static str) {
        self.state.collapsed = true;
        debug!(
            generation = self.state.generation,
            array_size = self.state.size(),
            reason,
            "array collapsed"
        );
    }
}

impl fmt::Debug for MutationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationEngine")
            .field("params", &self.params)
            .field("sampler", &self.sampler)
            .field("generation", &self.state.generation)
            .field("array_size", &self.state.size())
            .field("collapsed", &self.state.collapsed)
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn build_array(params: &SimulationParams) -> Result<RepeatArray, ConfigError> {
    params.validate()?;
    RepeatArray::from_unit(params.monomer()?, params.initial_size)
}

fn notify_mutation(
    observers: &mut [Box<dyn MutationObserver>],
    event: &MutationEvent,
) -> Result<(), SimulationError> {
    for observer in observers.iter_mut() {
        observer.on_mutation(event).map_err(SimulationError::Observer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ObserverError;
    use crate::simulation::events::MutationKind;
    use crate::simulation::observer::EventCollector;

    /// Small, fast configuration: 50 units of a 10 bp monomer, bounded to [20, 200].
    fn small_params() -> SimulationParams {
        SimulationParams {
            snp_rate: 2.0,
            indel_rate: 1.0,
            indel_size_lambda: 3.0,
            min_array_size: 20,
            max_array_size: 200,
            bounding_enabled: true,
            initial_size: 50,
            initial_monomer: "ACGTACGTAC".into(),
            max_consecutive_failures: 100,
            ..Default::default()
        }
    }

    #[test]
    fn test_engine_new() {
        let engine = MutationEngine::new(small_params(), 42).unwrap();

        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.array().unit_count(), 50);
        assert_eq!(engine.array().repeat_size(), 10);
        assert_eq!(engine.machine_state(), EngineState::Active);
        assert!(engine.history().is_empty());
        assert_eq!(engine.seed(), 42);
    }

    #[test]
    fn test_engine_new_rejects_zero_initial_size() {
        let params = SimulationParams {
            initial_size: 0,
            ..small_params()
        };
        assert_eq!(
            MutationEngine::new(params, 1).unwrap_err(),
            ConfigError::NonPositive("initial_size")
        );
    }

    #[test]
    fn test_step_increments_generation_once() {
        let mut engine = MutationEngine::new(small_params(), 42).unwrap();
        engine.step().unwrap();
        assert_eq!(engine.generation(), 1);
        engine.step().unwrap();
        assert_eq!(engine.generation(), 2);
    }

    #[test]
    fn test_step_returns_this_generations_events() {
        let mut engine = MutationEngine::new(small_params(), 42).unwrap();
        engine.run(5).unwrap();
        let before = engine.history().len();

        let events = engine.step().unwrap().to_vec();
        assert_eq!(engine.history().len(), before + events.len());
        assert!(events.iter().all(|e| e.generation == 6));
        assert_eq!(&engine.history()[before..], events.as_slice());
    }

    #[test]
    fn test_snps_precede_structural_events_within_generation() {
        let mut engine = MutationEngine::new(small_params(), 7).unwrap();
        for _ in 0..50 {
            let events = engine.step().unwrap();
            let first_structural = events
                .iter()
                .position(|e| e.kind != MutationKind::Snp)
                .unwrap_or(events.len());
            assert!(events[first_structural..].iter().all(|e| e.kind != MutationKind::Snp));
        }
    }

    #[test]
    fn test_snp_events_change_recorded_base() {
        let params = SimulationParams {
            indel_rate: 0.0,
            snp_rate: 5.0,
            ..small_params()
        };
        let mut engine = MutationEngine::new(params, 3).unwrap();
        let events = engine.step().unwrap().to_vec();

        for event in &events {
            let (old, new) = event.details.split_once("->").unwrap();
            assert_ne!(old, new);
            assert_eq!(event.size, 1);
        }
        // The last SNP at each position is what the array now holds
        if let Some(last) = events.last() {
            let new = last.details.chars().last().unwrap();
            assert_eq!(engine.array().base(last.position).unwrap().to_char(), new);
        }
    }

    #[test]
    fn test_zero_rates_leave_array_untouched() {
        let params = SimulationParams {
            snp_rate: 0.0,
            indel_rate: 0.0,
            ..small_params()
        };
        let mut engine = MutationEngine::new(params, 42).unwrap();
        let before = engine.array().clone();

        engine.run(500).unwrap();

        assert_eq!(engine.generation(), 500);
        assert_eq!(engine.array(), &before);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_collapsed_step_is_noop() {
        let params = SimulationParams {
            min_array_size: 5,
            max_array_size: 5,
            initial_size: 5,
            indel_rate: 10.0,
            max_consecutive_failures: 3,
            ..small_params()
        };
        let mut engine = MutationEngine::new(params, 42).unwrap();
        engine.run(1000).unwrap();
        assert!(engine.is_collapsed());

        let generation = engine.generation();
        let history_len = engine.history().len();
        let events = engine.step().unwrap();
        assert!(events.is_empty());
        assert_eq!(engine.generation(), generation);
        assert_eq!(engine.history().len(), history_len);
    }

    #[test]
    fn test_run_stops_at_collapse() {
        let params = SimulationParams {
            min_array_size: 5,
            max_array_size: 5,
            initial_size: 5,
            indel_rate: 10.0,
            max_consecutive_failures: 3,
            ..small_params()
        };
        let mut engine = MutationEngine::new(params, 42).unwrap();
        let state = engine.run(10_000).unwrap();

        assert!(state.collapsed());
        assert!(state.generation() < 10_000);
    }

    #[test]
    fn test_unbounded_deletions_collapse_below_minimum() {
        let params = SimulationParams {
            bounding_enabled: false,
            snp_rate: 0.0,
            indel_rate: 3.0,
            dup_bias: 0.0, // deletions only
            indel_size_lambda: 2.0,
            ..small_params()
        };
        let mut engine = MutationEngine::new(params, 11).unwrap();
        engine.run(10_000).unwrap();

        assert!(engine.is_collapsed());
        assert!(engine.array().unit_count() < 20);
        assert!(engine
            .history()
            .iter()
            .all(|e| e.kind == MutationKind::Deletion));
    }

    #[test]
    fn test_initialize_resets_state() {
        let mut engine = MutationEngine::new(small_params(), 42).unwrap();
        engine.run(20).unwrap();
        assert!(engine.generation() > 0);

        engine.initialize().unwrap();
        assert_eq!(engine.generation(), 0);
        assert!(engine.history().is_empty());
        assert_eq!(engine.array().unit_count(), 50);
        assert!(!engine.is_collapsed());
    }

    #[test]
    fn test_set_params_validates() {
        let mut engine = MutationEngine::new(small_params(), 42).unwrap();
        let bad = SimulationParams {
            snp_rate: -1.0,
            ..small_params()
        };
        assert!(engine.set_params(bad).is_err());
        assert_eq!(engine.params().snp_rate, 2.0);

        let quiet = SimulationParams {
            snp_rate: 0.0,
            indel_rate: 0.0,
            ..small_params()
        };
        engine.set_params(quiet).unwrap();
        engine.run(10).unwrap();
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_observer_sees_every_event_in_order() {
        let collector = EventCollector::new();
        let mut engine = MutationEngine::new(small_params(), 42).unwrap();
        engine.add_observer(collector.clone());

        engine.run(30).unwrap();

        assert_eq!(collector.drain(), engine.history().to_vec());
        assert_eq!(collector.drain_generations(), (1..=30).collect::<Vec<u64>>());
    }

    struct FailAfter {
        remaining: usize,
    }

    impl MutationObserver for FailAfter {
        fn on_mutation(&mut self, _event: &MutationEvent) -> Result<(), ObserverError> {
            if self.remaining == 0 {
                return Err("observer gave up".into());
            }
            self.remaining -= 1;
            Ok(())
        }
    }

    #[test]
    fn test_observer_failure_propagates() {
        let mut engine = MutationEngine::new(small_params(), 42).unwrap();
        engine.add_observer(FailAfter { remaining: 3 });

        let err = engine.run(1000).unwrap_err();
        assert!(matches!(err, SimulationError::Observer(_)));
        // The failing event was accepted before the observer saw it
        assert_eq!(engine.history().len(), 4);
    }

    #[test]
    fn test_generation_observer_failure_propagates() {
        struct FailOnGeneration;
        impl MutationObserver for FailOnGeneration {
            fn on_generation(&mut self, state: &SimulationState) -> Result<(), ObserverError> {
                if state.generation() == 3 {
                    Err("stop at 3".into())
                } else {
                    Ok(())
                }
            }
        }

        let mut engine = MutationEngine::new(small_params(), 42).unwrap();
        engine.add_observer(FailOnGeneration);
        assert!(engine.run(10).is_err());
        assert_eq!(engine.generation(), 3);
    }

    #[test]
    fn test_statistics_follow_history() {
        let mut engine = MutationEngine::new(small_params(), 5).unwrap();
        engine.run(100).unwrap();
        let stats = engine.get_statistics();

        assert_eq!(stats.generation, engine.generation());
        assert_eq!(stats.array_size, engine.array().unit_count());
        assert_eq!(stats.unique_sequences, engine.unique_units().len());
        assert_eq!(stats.total_events, stats.snps + stats.duplications + stats.deletions);
        let scanned_dups = engine
            .history()
            .iter()
            .filter(|e| e.kind == MutationKind::Duplication)
            .count();
        assert_eq!(stats.duplications, scanned_dups);
    }
}
