//! Shared helpers for database unit tests.

use chrono::NaiveDate;
use rusqlite::Connection;
use tempfile::tempdir;

use crate::classroom::{ClassroomId, NewClassroom};
use crate::database::{Database, DatabaseConfig};
use crate::interval::TimeInterval;
use crate::person::{NewPerson, PersonId, Role};
use crate::timetable::TimetableEntry;

/// Creates a database in a temporary directory that outlives the test.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Keep the directory alive for the lifetime of the test process
    std::mem::forget(dir);

    db
}

/// A person with an email derived from the name.
#[must_use]
pub fn new_person(first: &str, last: &str, role: Role) -> NewPerson {
    NewPerson {
        first_name: first.into(),
        last_name: last.into(),
        email: format!("{}.{}@campus.test", first.to_lowercase(), last.to_lowercase()),
        role,
    }
}

/// A classroom without features.
#[must_use]
pub fn new_classroom(room: &str, kind: &str, capacity: u32) -> NewClassroom {
    NewClassroom {
        room_number: room.into(),
        kind: kind.into(),
        capacity,
        features: Vec::new(),
    }
}

/// An unsaved entry.
///
/// # Panics
///
/// Panics on malformed day or time text.
#[must_use]
pub fn entry(day: &str, start: &str, end: &str, title: &str) -> TimetableEntry {
    TimetableEntry::new(TimeInterval::parse(day, start, end).unwrap(), title)
}

/// Parses a `yyyy-MM-dd` date.
///
/// # Panics
///
/// Panics on malformed input.
#[must_use]
pub fn date(text: &str) -> NaiveDate {
    crate::interval::parse_date(text).unwrap()
}

/// Ids created by [`seed_people_and_rooms`].
#[derive(Debug, Clone, Copy)]
pub struct Seed {
    pub admin: PersonId,
    pub professor: PersonId,
    pub student: PersonId,
    pub room: ClassroomId,
}

/// One person per role and one classroom.
///
/// # Panics
///
/// Panics if an insert fails.
pub fn seed_people_and_rooms(conn: &Connection) -> Seed {
    let admin = Database::insert_person(conn, &new_person("Root", "Admin", Role::Admin)).unwrap();
    let professor =
        Database::insert_person(conn, &new_person("Ada", "Lovelace", Role::Professor)).unwrap();
    let student =
        Database::insert_person(conn, &new_person("Alan", "Turing", Role::Student)).unwrap();
    let room = Database::insert_classroom(conn, &new_classroom("B-204", "Lecture", 40)).unwrap();
    Seed {
        admin: admin.id,
        professor: professor.id,
        student: student.id,
        room: room.id,
    }
}
