//! Common test utilities for integration tests.
//!
//! Fixture builders for people, rooms, groups and reservations, plus a
//! database that lives in its own temporary directory.

use chrono::NaiveDate;
use tempfile::TempDir;

use campus::class_group::ClassGroupDetails;
use campus::operations::{CreateGroupOptions, CreateGroupPlan, PlanExecutor};
use campus::{
    ClassGroupId, ClassroomId, Database, DatabaseConfig, NewClassroom, NewPerson, PersonId, Role,
    TimeInterval, TimetableEntry,
};

/// A database plus the directory that holds it.
///
/// The directory is removed when this is dropped.
pub struct TestDb {
    /// Open handle.
    pub db: Database,
    dir: TempDir,
}

#[allow(dead_code)]
impl TestDb {
    /// Creates an empty database in a fresh temporary directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let db = Database::open(DatabaseConfig::new(dir.path().join("campus.db")))
            .expect("failed to open database");
        Self { db, dir }
    }

    /// Opens a second handle on the same file, as another process would.
    pub fn second_handle(&self) -> Database {
        Database::open(DatabaseConfig::new(self.dir.path().join("campus.db")))
            .expect("failed to open second handle")
    }

    /// Registers a person and returns their id.
    pub fn person(&self, first: &str, last: &str, role: Role) -> PersonId {
        let person = NewPerson {
            first_name: first.into(),
            last_name: last.into(),
            email: format!("{}.{}@campus.test", first.to_lowercase(), last.to_lowercase()),
            role,
        };
        Database::insert_person(self.db.connection(), &person)
            .expect("failed to insert person")
            .id
    }

    /// Registers a classroom and returns its id.
    pub fn classroom(&self, room: &str) -> ClassroomId {
        let room = NewClassroom {
            room_number: room.into(),
            kind: "Lecture".into(),
            capacity: 40,
            features: Vec::new(),
        };
        Database::insert_classroom(self.db.connection(), &room)
            .expect("failed to insert classroom")
            .id
    }

    /// Creates a group through the normal plan and returns its id.
    pub fn group(
        &mut self,
        course_code: &str,
        professor: Option<PersonId>,
        students: Vec<PersonId>,
        entries: Vec<TimetableEntry>,
    ) -> ClassGroupId {
        let options = CreateGroupOptions::new(ClassGroupDetails::new("Section A", course_code))
            .with_professor(professor)
            .with_students(students)
            .with_entries(entries);
        let plan = CreateGroupPlan::new(options)
            .build_plan(&self.db)
            .expect("failed to plan group");
        PlanExecutor::new(&mut self.db)
            .execute(&plan)
            .expect("failed to create group")
            .class_group
            .expect("no group id returned")
    }
}

impl Default for TestDb {
    fn default() -> Self {
        Self::new()
    }
}

/// An unsaved timetable entry.
#[allow(dead_code)]
pub fn entry(day: &str, start: &str, end: &str, title: &str) -> TimetableEntry {
    TimetableEntry::new(
        TimeInterval::parse(day, start, end).expect("bad interval"),
        title,
    )
}

/// A date `days` from today, for plans that check timing against now.
#[allow(dead_code)]
pub fn days_from_today(days: i64) -> NaiveDate {
    chrono::Local::now().date_naive() + chrono::Duration::days(days)
}

/// `yyyy-MM-dd` text for a date.
#[allow(dead_code)]
pub fn date_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
