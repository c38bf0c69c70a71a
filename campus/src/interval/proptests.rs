//! Property-based tests for the half-open overlap rule.

use super::{TimeInterval, TimeOfDay, TimeRange, Weekday};
use proptest::prelude::*;

fn weekday_strategy() -> impl Strategy<Value = Weekday> {
    prop::sample::select(Weekday::ALL.to_vec())
}

fn range_strategy() -> impl Strategy<Value = TimeRange> {
    (0u16..TimeOfDay::LAST_MINUTE)
        .prop_flat_map(|start| (Just(start), (start + 1)..=TimeOfDay::LAST_MINUTE))
        .prop_map(|(start, end)| {
            TimeRange::new(
                TimeOfDay::from_minutes(start).unwrap(),
                TimeOfDay::from_minutes(end).unwrap(),
            )
            .unwrap()
        })
}

fn interval_strategy() -> impl Strategy<Value = TimeInterval> {
    (weekday_strategy(), range_strategy()).prop_map(|(day, range)| TimeInterval::new(day, range))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 5000,
        .. ProptestConfig::default()
    })]

    // Intervals on different days never collide
    #[test]
    fn different_days_never_overlap(a in interval_strategy(), b in interval_strategy()) {
        prop_assume!(a.day() != b.day());
        prop_assert!(!a.overlaps(&b));
    }

    // Overlap is symmetric
    #[test]
    fn overlap_is_symmetric(a in interval_strategy(), b in interval_strategy()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    // Every non-empty interval overlaps itself
    #[test]
    fn overlap_is_reflexive(a in interval_strategy()) {
        prop_assert!(a.overlaps(&a));
    }

    // Back-to-back intervals never collide
    #[test]
    fn touching_intervals_do_not_overlap(
        day in weekday_strategy(),
        (start, mid, end) in (0u16..1437).prop_flat_map(|s| {
            ((s + 1)..1438).prop_flat_map(move |m| (Just(s), Just(m), (m + 1)..=TimeOfDay::LAST_MINUTE))
        })
    ) {
        let t = |m| TimeOfDay::from_minutes(m).unwrap();
        let first = TimeInterval::new(day, TimeRange::new(t(start), t(mid)).unwrap());
        let second = TimeInterval::new(day, TimeRange::new(t(mid), t(end)).unwrap());
        prop_assert!(!first.overlaps(&second));
    }

    // Rendering and re-parsing a time is lossless
    #[test]
    fn time_text_roundtrip(minutes in 0u16..=TimeOfDay::LAST_MINUTE) {
        let time = TimeOfDay::from_minutes(minutes).unwrap();
        let parsed: TimeOfDay = time.to_string().parse().unwrap();
        prop_assert_eq!(parsed, time);
    }
}
