//! Property-based tests for timetable mirroring.

use super::{mirror_entries, sync, unsync};
use crate::class_group::{ClassGroup, ClassGroupDetails, ClassGroupId};
use crate::interval::{TimeInterval, TimeOfDay, TimeRange, Weekday};
use crate::timetable::TimetableEntry;
use proptest::prelude::*;

fn entry_strategy() -> impl Strategy<Value = TimetableEntry> {
    (
        prop::sample::select(Weekday::ALL.to_vec()),
        (0u16..1380),
        (1u16..=60),
        "[A-Za-z ]{1,12}",
    )
        .prop_map(|(day, start, len, title)| {
            let range = TimeRange::new(
                TimeOfDay::from_minutes(start).unwrap(),
                TimeOfDay::from_minutes(start + len).unwrap(),
            )
            .unwrap();
            TimetableEntry::new(TimeInterval::new(day, range), title)
        })
}

fn group_strategy() -> impl Strategy<Value = ClassGroup> {
    ("[A-Z]{2}[0-9]{3}", prop::collection::vec(entry_strategy(), 0..6)).prop_map(
        |(code, entries)| ClassGroup {
            id: ClassGroupId(1),
            details: ClassGroupDetails::new("Group", code),
            professor: None,
            students: Vec::new(),
            entries,
        },
    )
}

proptest! {
    // Syncing twice leaves the same timetable as syncing once
    #[test]
    fn sync_is_idempotent(
        group in group_strategy(),
        personal in prop::collection::vec(entry_strategy(), 0..6)
    ) {
        let mut once = personal.clone();
        sync(&mut once, &group);
        let mut twice = once.clone();
        sync(&mut twice, &group);
        prop_assert_eq!(once, twice);
    }

    // After sync the timetable holds exactly one mirror per group entry
    #[test]
    fn sync_yields_exact_mirror_set(
        group in group_strategy(),
        personal in prop::collection::vec(entry_strategy(), 0..6)
    ) {
        let mut timetable = personal;
        sync(&mut timetable, &group);
        let mirrors: Vec<_> = timetable
            .iter()
            .filter(|e| e.is_mirror_of(group.id, group.course_code()))
            .cloned()
            .collect();
        prop_assert_eq!(mirrors, mirror_entries(&group));
    }

    // Unsync after sync restores the non-mirror entries
    #[test]
    fn unsync_undoes_sync(
        group in group_strategy(),
        personal in prop::collection::vec(entry_strategy(), 0..6)
    ) {
        let original: Vec<_> = personal
            .iter()
            .filter(|e| !e.is_mirror_of(group.id, group.course_code()))
            .cloned()
            .collect();
        let mut timetable = personal;
        sync(&mut timetable, &group);
        unsync(&mut timetable, &group);
        prop_assert_eq!(timetable, original);
    }
}
