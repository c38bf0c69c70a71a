//! Property-based tests for the reservation status machine.

use super::{Reservation, ReservationStatus};
use crate::{ClassroomId, PersonId, TimeOfDay, TimeRange};
use chrono::NaiveDate;
use proptest::prelude::*;

fn status_strategy() -> impl Strategy<Value = ReservationStatus> {
    prop::sample::select(ReservationStatus::ALL.to_vec())
}

fn reservation_in(status_path: &[ReservationStatus]) -> Reservation {
    let mut r = Reservation::builder(
        PersonId(1),
        ClassroomId(1),
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        TimeRange::new(
            TimeOfDay::from_minutes(600).unwrap(),
            TimeOfDay::from_minutes(660).unwrap(),
        )
        .unwrap(),
    )
    .build()
    .unwrap();
    for &status in status_path {
        r.transition(status).unwrap();
    }
    r
}

proptest! {
    // No status can be re-entered
    #[test]
    fn no_self_transitions(status in status_strategy()) {
        prop_assert!(!status.can_transition_to(status));
    }

    // Terminal states have no outgoing transitions
    #[test]
    fn terminal_states_are_final(to in status_strategy()) {
        prop_assert!(!ReservationStatus::Canceled.can_transition_to(to));
        prop_assert!(!ReservationStatus::Rejected.can_transition_to(to));
    }

    // Nothing ever returns to PENDING
    #[test]
    fn pending_is_never_a_target(from in status_strategy()) {
        prop_assert!(!from.can_transition_to(ReservationStatus::Pending));
    }

    // `transition` agrees with the table and leaves status unchanged on failure
    #[test]
    fn transition_matches_table(
        path in prop::sample::select(vec![
            vec![],
            vec![ReservationStatus::Approved],
            vec![ReservationStatus::Rejected],
            vec![ReservationStatus::Canceled],
        ]),
        to in status_strategy()
    ) {
        let mut r = reservation_in(&path);
        let from = r.status();
        let result = r.transition(to);
        if from.can_transition_to(to) {
            prop_assert!(result.is_ok());
            prop_assert_eq!(r.status(), to);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(r.status(), from);
        }
    }
}
