//! Genome structures: the unit-granular tandem repeat array.

mod repeat_array;

pub use repeat_array::RepeatArray;
