use super::events::MutationKind;
use super::state::SimulationState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of summary statistics for a simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub generation: u64,
    /// Array size in units
    pub array_size: usize,
    /// Number of distinct unit contents
    pub unique_sequences: usize,
    /// `unique_sequences / array_size`, or 0 for an empty array
    pub diversity: f64,
    pub total_events: usize,
    pub snps: usize,
    pub duplications: usize,
    pub deletions: usize,
    pub collapsed: bool,
}

impl Statistics {
    /// Compute statistics from a state.
    ///
    /// Counting distinct units is O(array size); call at reporting cadence,
    /// not every generation.
    pub fn from_state(state: &SimulationState) -> Self {
        let array_size = state.size();
        let unique_sequences = state.array().unique_units().len();
        let diversity = if array_size > 0 {
            unique_sequences as f64 / array_size as f64
        } else {
            0.0
        };
        let history = state.history();

        Self {
            generation: state.generation(),
            array_size,
            unique_sequences,
            diversity,
            total_events: history.len(),
            snps: history.count(MutationKind::Snp),
            duplications: history.count(MutationKind::Duplication),
            deletions: history.count(MutationKind::Deletion),
            collapsed: state.collapsed(),
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gen={} size={} unique={} diversity={:.4} snps={} dups={} dels={}",
            self.generation,
            self.array_size,
            self.unique_sequences,
            self.diversity,
            self.snps,
            self.duplications,
            self.deletions
        )?;
        if self.collapsed {
            write!(f, " COLLAPSED")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Nucleotide;
    use crate::genome::RepeatArray;
    use crate::simulation::events::MutationEvent;

    #[test]
    fn test_statistics_uniform_array() {
        let state = SimulationState::new(RepeatArray::from_monomer("ACGT", 8).unwrap());
        let stats = Statistics::from_state(&state);

        assert_eq!(stats.generation, 0);
        assert_eq!(stats.array_size, 8);
        assert_eq!(stats.unique_sequences, 1);
        assert_eq!(stats.diversity, 0.125);
        assert_eq!(stats.total_events, 0);
        assert!(!stats.collapsed);
    }

    #[test]
    fn test_statistics_counts_and_diversity() {
        let mut state = SimulationState::new(RepeatArray::from_monomer("AAAA", 4).unwrap());
        state.array.set_base(0, Nucleotide::C).unwrap();
        state.array.set_base(5, Nucleotide::G).unwrap();
        state.record(MutationEvent::snp(1, 0, 'A', 'C'));
        state.record(MutationEvent::snp(1, 5, 'A', 'G'));
        state.record(MutationEvent::duplication(2, 0, 1));
        state.generation = 2;

        let stats = Statistics::from_state(&state);
        assert_eq!(stats.unique_sequences, 3);
        assert_eq!(stats.diversity, 0.75);
        assert_eq!(stats.snps, 2);
        assert_eq!(stats.duplications, 1);
        assert_eq!(stats.deletions, 0);
        assert_eq!(stats.total_events, 3);
    }

    #[test]
    fn test_statistics_empty_array() {
        let mut array = RepeatArray::from_monomer("AC", 2).unwrap();
        array.delete(0, 2).unwrap();
        let mut state = SimulationState::new(array);
        state.collapsed = true;

        let stats = Statistics::from_state(&state);
        assert_eq!(stats.diversity, 0.0);
        assert!(stats.collapsed);
        assert!(stats.to_string().ends_with("COLLAPSED"));
    }
}
