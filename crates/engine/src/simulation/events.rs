//! Mutation event records and the append-only log that holds them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an accepted mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    /// Single base substitution
    #[serde(rename = "snp")]
    Snp,
    /// Tandem duplication of a unit range
    #[serde(rename = "dup")]
    Duplication,
    /// Removal of a unit range
    #[serde(rename = "del")]
    Deletion,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Snp => write!(f, "snp"),
            Self::Duplication => write!(f, "dup"),
            Self::Deletion => write!(f, "del"),
        }
    }
}

/// Immutable record of one accepted mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationEvent {
    /// Generation in which the event happened (1-based)
    pub generation: u64,
    pub kind: MutationKind,
    /// Base-pair index for SNPs, start unit index for structural events
    pub position: usize,
    /// Units affected; 1 for SNPs
    pub size: usize,
    /// Free-form annotation, e.g. `"A->G"`
    pub details: String,
}

impl MutationEvent {
    pub(crate) fn snp(generation: u64, bp_index: usize, old: char, new: char) -> Self {
        Self {
            generation,
            kind: MutationKind::Snp,
            position: bp_index,
            size: 1,
            details: format!("{old}->{new}"),
        }
    }

    pub(crate) fn duplication(generation: u64, start: usize, end: usize) -> Self {
        Self {
            generation,
            kind: MutationKind::Duplication,
            position: start,
            size: end - start,
            details: format!("units {start}-{end} duplicated"),
        }
    }

    pub(crate) fn deletion(generation: u64, start: usize, end: usize) -> Self {
        Self {
            generation,
            kind: MutationKind::Deletion,
            position: start,
            size: end - start,
            details: format!("units {start}-{end} deleted"),
        }
    }
}

impl fmt::Display for MutationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Gen {}: {} at {} (size {}) {}",
            self.generation, self.kind, self.position, self.size, self.details
        )
    }
}

/// Append-only history of accepted events.
///
/// Per-kind counters are kept alongside the events so statistics do not have
/// to rescan the whole history; they always agree with a full scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<MutationEvent>,
    snps: usize,
    duplications: usize,
    deletions: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: MutationEvent) {
        match event.kind {
            MutationKind::Snp => self.snps += 1,
            MutationKind::Duplication => self.duplications += 1,
            MutationKind::Deletion => self.deletions += 1,
        }
        self.events.push(event);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in acceptance order.
    #[inline]
    pub fn as_slice(&self) -> &[MutationEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MutationEvent> {
        self.events.iter()
    }

    /// The most recent `n` events (fewer if the log is shorter).
    pub fn last_n(&self, n: usize) -> &[MutationEvent] {
        &self.events[self.events.len().saturating_sub(n)..]
    }

    /// Events recorded for one generation.
    ///
    /// Generations are appended in increasing order, so this is a binary
    /// search rather than a scan.
    pub fn generation(&self, generation: u64) -> &[MutationEvent] {
        let start = self.events.partition_point(|e| e.generation < generation);
        let end = self.events.partition_point(|e| e.generation <= generation);
        &self.events[start..end]
    }

    /// Number of recorded events of `kind`.
    pub fn count(&self, kind: MutationKind) -> usize {
        match kind {
            MutationKind::Snp => self.snps,
            MutationKind::Duplication => self.duplications,
            MutationKind::Deletion => self.deletions,
        }
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a MutationEvent;
    type IntoIter = std::slice::Iter<'a, MutationEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
