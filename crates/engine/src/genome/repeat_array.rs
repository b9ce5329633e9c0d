use crate::base::{Nucleotide, Unit};
use crate::errors::{ArrayError, ConfigError, IndexOutOfRange};
use std::collections::HashSet;
use std::fmt;

/// A tandem repeat array: an ordered run of fixed-length units.
///
/// The array is stored unit-granular rather than as a flat base string.
/// Structural edits (duplication and deletion of whole units) only move unit
/// handles, so their cost scales with the number of units shifted instead of
/// the number of base pairs, while a single-base edit touches one byte.
///
/// Invariant: every unit has length [`repeat_size`](Self::repeat_size), so
/// `bp_length() == unit_count() * repeat_size()` at all times. The array may
/// become empty through deletions; the repeat size is kept regardless.
///
/// # Examples
///
/// ```rust
/// # use censim_engine::genome::RepeatArray;
/// let mut array = RepeatArray::from_monomer("ACG", 4).unwrap();
/// assert_eq!(array.unit_count(), 4);
/// assert_eq!(array.bp_length(), 12);
///
/// array.duplicate(1, 3).unwrap(); // two fresh units after index 3
/// assert_eq!(array.unit_count(), 6);
///
/// array.delete(0, 5).unwrap();
/// assert_eq!(array.to_string(), "ACG");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatArray {
    units: Vec<Unit>,
    repeat_size: usize,
}

impl RepeatArray {
    /// Create an array of `copy_count` identical copies of `monomer`.
    pub fn from_monomer(monomer: &str, copy_count: usize) -> Result<Self, ConfigError> {
        Self::from_unit(Unit::new(monomer)?, copy_count)
    }

    /// Create an array of `copy_count` copies of an already parsed unit.
    pub fn from_unit(unit: Unit, copy_count: usize) -> Result<Self, ConfigError> {
        if copy_count == 0 {
            return Err(ConfigError::NonPositive("copy_count"));
        }
        let repeat_size = unit.len();
        Ok(Self {
            units: vec![unit; copy_count],
            repeat_size,
        })
    }

    /// Create an array from explicit units, which must all share one length.
    pub fn from_units(units: Vec<Unit>) -> Result<Self, ConfigError> {
        let repeat_size = units.first().map(Unit::len).ok_or(ConfigError::NonPositive("unit count"))?;
        if let Some(bad) = units.iter().find(|u| u.len() != repeat_size) {
            return Err(ConfigError::UnitLengthMismatch {
                expected: repeat_size,
                found: bad.len(),
            });
        }
        Ok(Self { units, repeat_size })
    }

    /// Split a flat sequence into consecutive units of `repeat_size` bases.
    ///
    /// The sequence length must be a non-zero multiple of `repeat_size`;
    /// partial trailing units would break frame alignment.
    pub fn from_sequence(sequence: &str, repeat_size: usize) -> Result<Self, ConfigError> {
        if repeat_size == 0 {
            return Err(ConfigError::NonPositive("repeat_size"));
        }
        if sequence.is_empty() {
            return Err(ConfigError::EmptyMonomer);
        }
        if sequence.len() % repeat_size != 0 {
            return Err(ConfigError::RaggedSequence {
                len: sequence.len(),
                repeat_size,
            });
        }

        let units = sequence
            .as_bytes()
            .chunks(repeat_size)
            .enumerate()
            .map(|(i, chunk)| {
                let bases = chunk
                    .iter()
                    .enumerate()
                    .map(|(j, &byte)| {
                        Nucleotide::from_ascii(byte).ok_or(ConfigError::InvalidBase {
                            found: byte as char,
                            position: i * repeat_size + j,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Unit::from_nucleotides(&bases)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { units, repeat_size })
    }

    /// Number of units in the array.
    #[inline]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Total length in base pairs.
    #[inline]
    pub fn bp_length(&self) -> usize {
        self.units.len() * self.repeat_size
    }

    /// Fixed length of every unit.
    #[inline]
    pub fn repeat_size(&self) -> usize {
        self.repeat_size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Borrow all units in order.
    #[inline]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Borrow the unit at `index`.
    pub fn get_unit(&self, index: usize) -> Result<&Unit, IndexOutOfRange> {
        self.units.get(index).ok_or(IndexOutOfRange {
            index,
            len: self.units.len(),
        })
    }

    /// Read the base at a base-pair coordinate.
    pub fn base(&self, bp_index: usize) -> Result<Nucleotide, IndexOutOfRange> {
        let len = self.bp_length();
        if bp_index >= len {
            return Err(IndexOutOfRange { index: bp_index, len });
        }
        let unit = &self.units[bp_index / self.repeat_size];
        unit.get(bp_index % self.repeat_size)
            .ok_or(IndexOutOfRange { index: bp_index, len })
    }

    /// Overwrite the base at a base-pair coordinate and return the old base.
    pub fn set_base(&mut self, bp_index: usize, base: Nucleotide) -> Result<Nucleotide, IndexOutOfRange> {
        let len = self.bp_length();
        if bp_index >= len {
            return Err(IndexOutOfRange { index: bp_index, len });
        }
        let unit = &mut self.units[bp_index / self.repeat_size];
        unit.set(bp_index % self.repeat_size, base)
            .map_err(|_| IndexOutOfRange { index: bp_index, len })
    }

    /// Tandem duplication: insert a fresh copy of units `[start, end)`
    /// immediately after `end - 1`, shifting later units right.
    ///
    /// ```text
    /// before:          [A][B][C][D][E]
    /// duplicate(1, 3): [A][B][C][B][C][D][E]
    /// ```
    pub fn duplicate(&mut self, start: usize, end: usize) -> Result<(), ArrayError> {
        self.check_range(start, end)?;
        let copies: Vec<Unit> = self.units[start..end].to_vec();
        self.units.splice(end..end, copies);
        Ok(())
    }

    /// Remove units `[start, end)`.
    ///
    /// ```text
    /// before:       [A][B][C][D][E]
    /// delete(1, 3): [A][D][E]
    /// ```
    pub fn delete(&mut self, start: usize, end: usize) -> Result<(), ArrayError> {
        self.check_range(start, end)?;
        self.units.drain(start..end);
        Ok(())
    }

    /// The distinct unit contents currently present.
    ///
    /// Recomputed from scratch on every call; intended for reporting and
    /// colorization, not for the per-generation hot path.
    pub fn unique_units(&self) -> HashSet<&Unit> {
        self.units.iter().collect()
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), ArrayError> {
        if start >= end {
            return Err(ConfigError::EmptyRange { start, end }.into());
        }
        if end > self.units.len() {
            return Err(IndexOutOfRange {
                index: end,
                len: self.units.len(),
            }
            .into());
        }
        Ok(())
    }
}

impl fmt::Display for RepeatArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for unit in &self.units {
            write!(f, "{unit}")?;
        }
        Ok(())
    }
}
