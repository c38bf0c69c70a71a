//! Conflict and role checks shared by planning and execution.
//!
//! Plans run these to fail fast with a clear error; the executor runs them
//! again on the transaction that performs the write.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::classroom::ClassroomId;
use crate::conflict::{conflicting_reservations, ConflictDetector, ConflictReport, ScheduleSubject};
use crate::database::{Database, DatabaseCommitments};
use crate::error::{Error, Result};
use crate::interval::{TimeInterval, TimeRange};
use crate::person::{Person, PersonId, Role};
use crate::reservation::{ReservationId, ReservationStatus};
use crate::timetable::TimetableEntry;

use super::plan::RoomCheck;

/// Fails with [`Error::SlotUnavailable`] if the room slot is taken.
///
/// # Errors
///
/// Returns [`Error::SlotUnavailable`], [`Error::InvalidTimeRange`] or a
/// database error.
pub fn ensure_room_free(
    conn: &Connection,
    classroom: ClassroomId,
    date: NaiveDate,
    range: &TimeRange,
    exclude: Option<&ReservationId>,
    check: RoomCheck,
) -> Result<()> {
    if check == RoomCheck::Skip {
        return Ok(());
    }

    let active = Database::active_reservations_for(conn, classroom, date)?;
    let candidates = active
        .iter()
        .filter(|r| check == RoomCheck::Active || r.status() == ReservationStatus::Approved);
    let hits = conflicting_reservations(
        candidates,
        classroom,
        date,
        range.start(),
        range.end(),
        exclude,
    )?;

    if hits.is_empty() {
        Ok(())
    } else {
        Err(Error::SlotUnavailable {
            subject: format!("classroom {classroom}"),
            report: Box::new(ConflictReport::for_room(date, range)),
        })
    }
}

/// Batch check of a whole schedule for `subject`.
///
/// # Errors
///
/// Returns [`Error::SlotUnavailable`] with the grouped report, or any
/// lookup error.
pub fn ensure_schedule_free(
    conn: &Connection,
    subject: &ScheduleSubject<'_>,
    entries: &[TimetableEntry],
) -> Result<()> {
    let candidates: Vec<TimeInterval> = entries.iter().map(|e| e.interval).collect();
    let source = DatabaseCommitments::new(conn);
    ConflictDetector::new(&source).detect_batch(subject, &candidates)
}

/// Advisory report of a schedule's collisions for `subject`.
///
/// # Errors
///
/// Returns any lookup error.
pub fn schedule_report(
    conn: &Connection,
    subject: &ScheduleSubject<'_>,
    entries: &[TimetableEntry],
) -> Result<ConflictReport> {
    let candidates: Vec<TimeInterval> = entries.iter().map(|e| e.interval).collect();
    let source = DatabaseCommitments::new(conn);
    ConflictDetector::new(&source).detect(subject, &candidates)
}

/// Loads a person and checks their role.
///
/// # Errors
///
/// Returns [`Error::NotFound`] or [`Error::RoleMismatch`].
pub fn require_role(conn: &Connection, id: PersonId, role: Role) -> Result<Person> {
    let person = Database::require_person(conn, id)?;
    person.require_role(role)?;
    Ok(person)
}

/// Checks a set of people all hold `role`, rejecting duplicates.
///
/// # Errors
///
/// Returns [`Error::NotFound`], [`Error::RoleMismatch`] or a validation
/// error for a repeated id.
pub fn require_all(conn: &Connection, ids: &[PersonId], role: Role) -> Result<()> {
    for (i, id) in ids.iter().enumerate() {
        if ids[..i].contains(id) {
            return Err(Error::Validation {
                field: "students".into(),
                message: format!("person {id} is listed more than once"),
            });
        }
        require_role(conn, *id, role)?;
    }
    Ok(())
}
