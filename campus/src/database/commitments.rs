//! [`CommitmentSource`] over a `SQLite` connection.

use rusqlite::Connection;

use crate::class_group::ClassGroup;
use crate::conflict::CommitmentSource;
use crate::error::Result;
use crate::person::{Person, PersonId};
use crate::timetable::TimetableEntry;

use super::Database;

/// Reads commitments through a borrowed connection.
///
/// A `rusqlite::Transaction` derefs to a `Connection`, so the same adapter
/// serves both plain reads and the re-check inside a write transaction.
#[derive(Debug, Clone, Copy)]
pub struct DatabaseCommitments<'c> {
    conn: &'c Connection,
}

impl<'c> DatabaseCommitments<'c> {
    /// Wraps `conn`.
    #[must_use]
    pub const fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl CommitmentSource for DatabaseCommitments<'_> {
    fn person(&self, id: PersonId) -> Result<Option<Person>> {
        Database::get_person(self.conn, id)
    }

    fn class_groups_for_professor(&self, professor: PersonId) -> Result<Vec<ClassGroup>> {
        Database::class_groups_for_professor(self.conn, professor)
    }

    fn class_groups_for_student(&self, student: PersonId) -> Result<Vec<ClassGroup>> {
        Database::class_groups_for_student(self.conn, student)
    }

    fn personal_entries(&self, person: PersonId) -> Result<Vec<TimetableEntry>> {
        Database::personal_entries(self.conn, person)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_group::ClassGroupDetails;
    use crate::conflict::{ConflictDetector, ScheduleSubject};
    use crate::database::test_util::{create_test_database, entry, new_person};
    use crate::person::Role;
    use crate::TimeInterval;

    #[test]
    fn test_detector_reads_stored_commitments() {
        let db = create_test_database();
        let conn = db.connection();
        let prof = Database::insert_person(conn, &new_person("Ada", "Lovelace", Role::Professor))
            .unwrap();
        let busy = Database::insert_class_group(
            conn,
            &ClassGroupDetails::new("Databases", "CS301"),
            Some(prof.id),
        )
        .unwrap();
        Database::replace_group_entries(
            conn,
            busy.id,
            &[entry("Monday", "09:00", "10:00", "Lecture")],
        )
        .unwrap();

        let source = DatabaseCommitments::new(conn);
        let subject = ScheduleSubject {
            class_group: None,
            course_code: "CS101",
            professor: Some(prof.id),
            students: &[],
        };
        let slot = TimeInterval::parse("Monday", "09:30", "10:30").unwrap();
        let report = ConflictDetector::new(&source)
            .detect_single(&subject, &slot)
            .unwrap();

        assert_eq!(report.len(), 1);
        let window = report.window("Monday (09:30 - 10:30)").unwrap();
        assert_eq!(window.professors[0].full_name(), "Ada Lovelace");
    }
}
