use core::fmt;

use serde::{Deserialize, Serialize};

/// A DNA nucleotide base.
///
/// Backed by a single byte. The discriminant order (A, C, G, T) fixes the
/// order of [`Nucleotide::others`], which seeded substitution draws rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Nucleotide {
    A = 0,
    C = 1,
    G = 2,
    T = 3,
}

impl Nucleotide {
    /// All four bases in index order.
    pub const ALL: [Nucleotide; 4] = [Self::A, Self::C, Self::G, Self::T];

    /// Convert from an ASCII byte, accepting lowercase as well. Returns `None`
    /// for anything outside the A/C/G/T alphabet.
    #[inline]
    pub const fn from_ascii(byte: u8) -> Option<Self> {
        match byte {
            b'A' | b'a' => Some(Self::A),
            b'C' | b'c' => Some(Self::C),
            b'G' | b'g' => Some(Self::G),
            b'T' | b't' => Some(Self::T),
            _ => None,
        }
    }

    /// Uppercase ASCII byte for this base.
    #[inline(always)]
    pub const fn to_ascii(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
        }
    }

    #[inline(always)]
    pub const fn to_char(self) -> char {
        self.to_ascii() as char
    }

    /// The three bases that differ from `self`, in index order.
    ///
    /// A substitution picks uniformly from this array, so an SNP never
    /// "mutates" a base into itself.
    #[inline]
    pub const fn others(self) -> [Nucleotide; 3] {
        match self {
            Self::A => [Self::C, Self::G, Self::T],
            Self::C => [Self::A, Self::G, Self::T],
            Self::G => [Self::A, Self::C, Self::T],
            Self::T => [Self::A, Self::C, Self::G],
        }
    }
}

impl From<Nucleotide> for char {
    #[inline(always)]
    fn from(nuc: Nucleotide) -> char {
        nuc.to_char()
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
