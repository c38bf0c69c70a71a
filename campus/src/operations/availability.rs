//! Free classroom search.

use crate::classroom::Classroom;
use crate::conflict::has_conflicting_reservation;
use crate::database::Database;
use crate::error::Result;
use crate::interval::{parse_date, TimeRange};

/// What kind of room is wanted, and when.
#[derive(Debug, Clone)]
pub struct AvailabilityQuery {
    /// `yyyy-MM-dd`.
    pub date: String,
    /// `HH:MM`.
    pub start: String,
    /// `HH:MM`.
    pub end: String,
    /// Room category; any when `None`.
    pub kind: Option<String>,
    /// Smallest acceptable capacity.
    pub min_capacity: u32,
}

impl AvailabilityQuery {
    /// Any room, any size.
    #[must_use]
    pub fn new(date: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            start: start.into(),
            end: end.into(),
            kind: None,
            min_capacity: 0,
        }
    }

    /// Restricts to one category.
    #[must_use]
    pub fn with_kind(mut self, kind: Option<String>) -> Self {
        self.kind = kind;
        self
    }

    /// Requires at least `capacity` seats.
    #[must_use]
    pub const fn with_min_capacity(mut self, capacity: u32) -> Self {
        self.min_capacity = capacity;
        self
    }
}

/// Classrooms matching `query` with no PENDING or APPROVED booking in the
/// requested slot, ordered by room number.
///
/// # Errors
///
/// Returns a parse error for the date or times, or a database error.
///
/// # Examples
///
/// ```no_run
/// use campus::operations::{find_available_classrooms, AvailabilityQuery};
/// use campus::{Database, DatabaseConfig};
///
/// let db = Database::open(DatabaseConfig::new("/tmp/campus.db")).unwrap();
/// let query = AvailabilityQuery::new("2025-03-10", "14:00", "15:00").with_min_capacity(30);
/// for room in find_available_classrooms(&db, &query).unwrap() {
///     println!("{} ({} seats)", room.room_number, room.capacity);
/// }
/// ```
pub fn find_available_classrooms(db: &Database, query: &AvailabilityQuery) -> Result<Vec<Classroom>> {
    let conn = db.connection();
    let date = parse_date(&query.date)?;
    let range = TimeRange::parse(&query.start, &query.end)?;

    let mut free = Vec::new();
    for room in Database::list_classrooms(conn)? {
        if !room.matches(query.kind.as_deref(), query.min_capacity) {
            continue;
        }
        let booked = Database::active_reservations_for(conn, room.id, date)?;
        if !has_conflicting_reservation(&booked, room.id, date, range.start(), range.end(), None)? {
            free.push(room);
        }
    }
    log::debug!("{} classroom(s) free on {date} ({range})", free.len());
    Ok(free)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, date, new_classroom, seed_people_and_rooms};
    use crate::{Reservation, ReservationStatus};

    #[test]
    fn test_booked_and_unsuitable_rooms_are_excluded() {
        let db = create_test_database();
        let seed = seed_people_and_rooms(db.connection());
        let lab = Database::insert_classroom(db.connection(), &new_classroom("L-1", "Lab", 20)).unwrap();
        let small = Database::insert_classroom(db.connection(), &new_classroom("A-1", "Lecture", 10)).unwrap();

        let booked = Reservation::builder(
            seed.student,
            seed.room,
            date("2025-03-10"),
            TimeRange::parse("14:00", "15:00").unwrap(),
        )
        .build()
        .unwrap();
        Database::insert_reservation(db.connection(), &booked).unwrap();

        let any = find_available_classrooms(&db, &AvailabilityQuery::new("2025-03-10", "14:30", "15:30")).unwrap();
        let ids: Vec<_> = any.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![small.id, lab.id]);

        let lectures = AvailabilityQuery::new("2025-03-10", "15:00", "16:00")
            .with_kind(Some("Lecture".into()))
            .with_min_capacity(20);
        let ids: Vec<_> = find_available_classrooms(&db, &lectures)
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![seed.room]);
    }

    #[test]
    fn test_canceled_booking_frees_the_room() {
        let db = create_test_database();
        let seed = seed_people_and_rooms(db.connection());
        let canceled = Reservation::builder(
            seed.student,
            seed.room,
            date("2025-03-10"),
            TimeRange::parse("14:00", "15:00").unwrap(),
        )
        .status(ReservationStatus::Canceled)
        .build()
        .unwrap();
        Database::insert_reservation(db.connection(), &canceled).unwrap();

        let rooms = find_available_classrooms(&db, &AvailabilityQuery::new("2025-03-10", "14:00", "15:00")).unwrap();
        assert_eq!(rooms.len(), 1);
    }

    #[test]
    fn test_bad_range_is_rejected() {
        let db = create_test_database();
        assert!(find_available_classrooms(&db, &AvailabilityQuery::new("2025-03-10", "15:00", "14:00")).is_err());
    }
}
