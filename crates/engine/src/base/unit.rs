use super::Nucleotide;
use crate::errors::{ConfigError, IndexOutOfRange};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One repeat unit (monomer) of a tandem array.
///
/// Stored as uppercase ASCII bytes over the A/C/G/T alphabet. The byte
/// string is what colorizers and other read-only consumers see through
/// [`Unit::as_bytes`], so its encoding is part of the public contract.
///
/// A unit never changes length after construction; only single bases can be
/// overwritten in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Unit(Box<[u8]>);

impl Unit {
    /// Parse a unit from text, normalizing to uppercase.
    ///
    /// Fails with [`ConfigError::EmptyMonomer`] for empty input and
    /// [`ConfigError::InvalidBase`] for characters outside A/C/G/T.
    pub fn new(content: &str) -> Result<Self, ConfigError> {
        if content.is_empty() {
            return Err(ConfigError::EmptyMonomer);
        }

        let bytes = content
            .chars()
            .enumerate()
            .map(|(position, c)| {
                u8::try_from(c)
                    .ok()
                    .and_then(Nucleotide::from_ascii)
                    .map(Nucleotide::to_ascii)
                    .ok_or(ConfigError::InvalidBase { found: c, position })
            })
            .collect::<Result<Vec<u8>, _>>()?;

        Ok(Self(bytes.into_boxed_slice()))
    }

    /// Build a unit from a slice of bases.
    pub fn from_nucleotides(bases: &[Nucleotide]) -> Result<Self, ConfigError> {
        if bases.is_empty() {
            return Err(ConfigError::EmptyMonomer);
        }
        Ok(Self(bases.iter().map(|n| n.to_ascii()).collect()))
    }

    /// Length of the unit in bases.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed unit; provided for API symmetry.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the raw uppercase ASCII content.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Base at `offset`, or `None` if out of range.
    #[inline]
    pub fn get(&self, offset: usize) -> Option<Nucleotide> {
        self.0.get(offset).copied().and_then(Nucleotide::from_ascii)
    }

    /// Overwrite the base at `offset`, returning the previous base.
    #[inline]
    pub fn set(&mut self, offset: usize, base: Nucleotide) -> Result<Nucleotide, IndexOutOfRange> {
        let len = self.len();
        let slot = self.0.get_mut(offset).ok_or(IndexOutOfRange { index: offset, len })?;
        // Content is validated on construction, so the fallback never triggers.
        let old = Nucleotide::from_ascii(*slot).unwrap_or(Nucleotide::A);
        *slot = base.to_ascii();
        Ok(old)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in self.0.iter() {
            write!(f, "{}", byte as char)?;
        }
        Ok(())
    }
}

impl FromStr for Unit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Unit {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> String {
        unit.to_string()
    }
}
