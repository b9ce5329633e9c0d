//! Base types for sequence representation.
//!
//! Nucleotides and the fixed-length repeat units built from them.

mod nucleotide;
mod unit;

pub use nucleotide::Nucleotide;
pub use unit::Unit;
