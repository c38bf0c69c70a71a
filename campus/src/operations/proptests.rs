//! Property-based tests for reservation planning against a live database.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use super::policy::week_bounds;
use super::{PlanExecutor, ReserveOptions, ReservePlan};
use crate::database::test_util::{create_test_database, seed_people_and_rooms};
use crate::{Database, Settings, TimeRange};

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=365).prop_map(|(year, ordinal)| {
        NaiveDate::from_yo_opt(year, ordinal).unwrap()
    })
}

// Quarter-hour slots between 08:00 and 18:00, 15 to 120 minutes long
fn slot_strategy() -> impl Strategy<Value = (String, String)> {
    (32u16..72, 1u16..=8).prop_map(|(quarter, len)| {
        let start = quarter * 15;
        let end = start + len * 15;
        (
            format!("{:02}:{:02}", start / 60, start % 60),
            format!("{:02}:{:02}", end / 60, end % 60),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // The ISO week always runs Monday to Sunday around the date
    #[test]
    fn week_bounds_contain_date(date in date_strategy()) {
        let (monday, sunday) = week_bounds(date);
        prop_assert!(monday <= date && date <= sunday);
        prop_assert_eq!(monday.weekday(), chrono::Weekday::Mon);
        prop_assert_eq!((sunday - monday).num_days(), 6);
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        .. ProptestConfig::default()
    })]

    // Whatever sequence of requests arrives, no two active reservations
    // of one room overlap
    #[test]
    fn accepted_reservations_never_overlap(slots in prop::collection::vec(slot_strategy(), 1..12)) {
        let mut db = create_test_database();
        let seed = seed_people_and_rooms(db.connection());
        let settings = Settings {
            max_reservations_per_week: 100,
            ..Settings::default()
        };
        let now = NaiveDateTime::parse_from_str("2025-03-07 08:00", "%Y-%m-%d %H:%M").unwrap();

        for (start, end) in &slots {
            let options = ReserveOptions::new(seed.admin, seed.room, "2025-03-10", start, end)
                .with_now(now);
            match ReservePlan::new(options, &settings).build_plan(&db) {
                Ok(plan) => {
                    PlanExecutor::new(&mut db).execute(&plan).unwrap();
                }
                Err(e) => prop_assert!(e.is_slot_unavailable(), "unexpected error {e}"),
            }
        }

        let stored = Database::active_reservations_for(
            db.connection(),
            seed.room,
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        )
        .unwrap();
        let ranges: Vec<TimeRange> = stored.iter().map(crate::Reservation::range).collect();
        for (i, a) in ranges.iter().enumerate() {
            for b in &ranges[i + 1..] {
                prop_assert!(!a.overlaps(b), "{} overlaps {}", a, b);
            }
        }
    }
}
