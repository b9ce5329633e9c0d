//! Property tests for repeat array edits.

use censim_engine::base::Unit;
use censim_engine::genome::RepeatArray;
use proptest::collection;
use proptest::prelude::*;

const UNIT_LEN: usize = 6;

fn unit_strategy() -> impl Strategy<Value = Unit> {
    collection::vec(prop::sample::select(vec!['A', 'C', 'G', 'T']), UNIT_LEN)
        .prop_map(|bases| Unit::new(&bases.into_iter().collect::<String>()).unwrap())
}

fn array_strategy() -> impl Strategy<Value = RepeatArray> {
    collection::vec(unit_strategy(), 1..40).prop_map(|units| RepeatArray::from_units(units).unwrap())
}

#[derive(Debug, Clone)]
enum Edit {
    Duplicate(usize, usize),
    Delete(usize, usize),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    (any::<bool>(), 0usize..64, 1usize..8).prop_map(|(dup, start, size)| {
        if dup {
            Edit::Duplicate(start, start + size)
        } else {
            Edit::Delete(start, start + size)
        }
    })
}

proptest! {
    #[test]
    fn duplicate_then_delete_copy_restores(
        array in array_strategy(),
        start_frac in 0.0f64..1.0,
        size in 1usize..10,
    ) {
        let len = array.unit_count();
        let start = ((len as f64) * start_frac) as usize % len;
        let end = (start + size).min(len);

        let mut edited = array.clone();
        edited.duplicate(start, end).unwrap();
        prop_assert_eq!(edited.unit_count(), len + (end - start));
        prop_assert_eq!(&edited.units()[end..2 * end - start], &array.units()[start..end]);

        edited.delete(end, 2 * end - start).unwrap();
        prop_assert_eq!(edited, array);
    }

    #[test]
    fn edits_preserve_unit_granularity(
        array in array_strategy(),
        edits in collection::vec(edit_strategy(), 0..30),
    ) {
        let mut array = array;
        for edit in edits {
            let before = array.unit_count();
            let (result, expected) = match edit {
                Edit::Duplicate(s, e) => (array.duplicate(s, e), before + (e - s)),
                Edit::Delete(s, e) => (array.delete(s, e), before.saturating_sub(e - s)),
            };

            match result {
                Ok(()) => prop_assert_eq!(array.unit_count(), expected),
                // Rejected edits leave the array untouched
                Err(_) => prop_assert_eq!(array.unit_count(), before),
            }
            prop_assert_eq!(array.bp_length(), array.unit_count() * UNIT_LEN);
            prop_assert!(array.units().iter().all(|u| u.len() == UNIT_LEN));
        }
    }

    #[test]
    fn sequence_round_trip(array in array_strategy()) {
        let rebuilt = RepeatArray::from_sequence(&array.to_string(), UNIT_LEN).unwrap();
        prop_assert_eq!(rebuilt, array);
    }
}
