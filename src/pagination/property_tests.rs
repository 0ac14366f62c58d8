//! Property-Based Tests for Page Merging
//!
//! Uses proptest to check the merge invariants over arbitrary lists and offsets.

use proptest::prelude::*;

use crate::pagination::{merge, PageArgs, Sequence};

fn sequence_strategy() -> impl Strategy<Value = Sequence<u16>> {
    prop::collection::vec(prop::option::weighted(0.9, any::<u16>()), 0..40)
}

fn page_strategy() -> impl Strategy<Value = Vec<u16>> {
    prop::collection::vec(any::<u16>(), 0..15)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Every incoming item lands at start + i.
    #[test]
    fn prop_incoming_lands_at_offset(
        existing in sequence_strategy(),
        incoming in page_strategy(),
        start in 0i64..60
    ) {
        let merged = merge(Some(existing.as_slice()), &incoming, Some(&PageArgs::at(start, incoming.len() as u64))).unwrap();
        let start = start as usize;

        for (i, item) in incoming.iter().enumerate() {
            prop_assert_eq!(merged[start + i], Some(*item));
        }
    }

    // Positions outside the page keep their prior value or become holes.
    #[test]
    fn prop_other_positions_preserved(
        existing in sequence_strategy(),
        incoming in page_strategy(),
        start in 0i64..60
    ) {
        let merged = merge(Some(existing.as_slice()), &incoming, Some(&PageArgs::at(start, 0))).unwrap();
        let start = start as usize;
        let end = start + incoming.len();

        prop_assert_eq!(merged.len(), existing.len().max(end));
        for (i, slot) in merged.iter().enumerate() {
            if i >= start && i < end {
                continue;
            }
            let prior = existing.get(i).cloned().flatten();
            prop_assert_eq!(*slot, prior);
        }
    }

    // Inputs are never modified.
    #[test]
    fn prop_merge_is_pure(
        existing in sequence_strategy(),
        incoming in page_strategy(),
        start in prop::option::of(-5i64..60)
    ) {
        let existing_before = existing.clone();
        let incoming_before = incoming.clone();
        let args = PageArgs { start, ..PageArgs::default() };

        let _ = merge(Some(existing.as_slice()), &incoming, Some(&args));

        prop_assert_eq!(existing, existing_before);
        prop_assert_eq!(incoming, incoming_before);
    }

    // Without a start the page is returned verbatim.
    #[test]
    fn prop_missing_start_replaces(
        existing in sequence_strategy(),
        incoming in page_strategy(),
        limit in prop::option::of(0u64..50)
    ) {
        let args = PageArgs { limit, ..PageArgs::default() };
        let merged = merge(Some(existing.as_slice()), &incoming, Some(&args)).unwrap();
        let expected: Sequence<u16> = incoming.iter().copied().map(Some).collect();

        prop_assert_eq!(merged, expected);
    }

    // Merging the same page twice changes nothing the second time.
    #[test]
    fn prop_merge_idempotent(
        existing in sequence_strategy(),
        incoming in page_strategy(),
        start in 0i64..60
    ) {
        let args = PageArgs::at(start, incoming.len() as u64);
        let once = merge(Some(existing.as_slice()), &incoming, Some(&args)).unwrap();
        let twice = merge(Some(once.as_slice()), &incoming, Some(&args)).unwrap();

        prop_assert_eq!(once, twice);
    }

    // Negative offsets are always rejected.
    #[test]
    fn prop_negative_start_rejected(
        existing in sequence_strategy(),
        incoming in page_strategy(),
        start in i64::MIN..0
    ) {
        prop_assert!(merge(Some(existing.as_slice()), &incoming, Some(&PageArgs::at(start, 1))).is_err());
    }
}
