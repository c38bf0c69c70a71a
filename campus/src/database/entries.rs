//! Timetable entry queries, shared by class-group schedules and personal
//! timetables.

use rusqlite::{params, Connection};

use crate::class_group::{ClassGroup, ClassGroupId};
use crate::error::Result;
use crate::person::PersonId;
use crate::sync::{mirror_entries, SyncOutcome};
use crate::timetable::{EntryId, EntryOwner, TimetableEntry};

use super::rows::interval_columns;
use super::Database;

const INSERT_ENTRY: &str = r"
    INSERT INTO timetable_entries (
        class_group_id, person_id, day, start_minute, end_minute, title,
        instructor, location, color, kind, subject, source_class_group, position
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const ENTRY_COLUMNS: &str = r"
    id, day, start_minute, end_minute, title, instructor, location, color, kind,
    subject, source_class_group
";

const DELETE_GROUP_ENTRIES: &str = "DELETE FROM timetable_entries WHERE class_group_id = ?";

const DELETE_ENTRY: &str = "DELETE FROM timetable_entries WHERE id = ?";

const NEXT_PERSONAL_POSITION: &str =
    "SELECT COALESCE(MAX(position) + 1, 0) FROM timetable_entries WHERE person_id = ?";

/// Expects the columns of [`ENTRY_COLUMNS`] in order.
fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<TimetableEntry> {
    Ok(TimetableEntry {
        id: Some(EntryId(row.get(0)?)),
        interval: interval_columns(row, 1)?,
        title: row.get(4)?,
        instructor: row.get(5)?,
        location: row.get(6)?,
        color: row.get(7)?,
        kind: row.get(8)?,
        subject: row.get(9)?,
        source_class_group: row.get::<_, Option<i64>>(10)?.map(ClassGroupId),
    })
}

fn select_entries(conn: &Connection, owner: EntryOwner) -> Result<Vec<TimetableEntry>> {
    let (column, id) = match owner {
        EntryOwner::ClassGroup(id) => ("class_group_id", id.0),
        EntryOwner::Person(id) => ("person_id", id.0),
    };
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM timetable_entries WHERE {column} = ? ORDER BY position, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let entries = stmt
        .query_map([id], row_to_entry)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(entries)
}

impl Database {
    /// Stores one entry for `owner` at `position` and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_entry(
        conn: &Connection,
        owner: EntryOwner,
        position: usize,
        entry: &TimetableEntry,
    ) -> Result<EntryId> {
        let (group, person) = match owner {
            EntryOwner::ClassGroup(id) => (Some(id.0), None),
            EntryOwner::Person(id) => (None, Some(id.0)),
        };
        conn.execute(
            INSERT_ENTRY,
            params![
                group,
                person,
                entry.interval.day().name(),
                entry.interval.start().minutes(),
                entry.interval.end().minutes(),
                entry.title,
                entry.instructor,
                entry.location,
                entry.color,
                entry.kind,
                entry.subject,
                entry.source_class_group.map(|g| g.0),
                i64::try_from(position).unwrap_or(i64::MAX),
            ],
        )?;
        Ok(EntryId(conn.last_insert_rowid()))
    }

    /// Loads a class group's schedule in stored order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn group_entries(conn: &Connection, group: ClassGroupId) -> Result<Vec<TimetableEntry>> {
        select_entries(conn, EntryOwner::ClassGroup(group))
    }

    /// Replaces a class group's schedule wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails.
    pub fn replace_group_entries(
        conn: &Connection,
        group: ClassGroupId,
        entries: &[TimetableEntry],
    ) -> Result<Vec<EntryId>> {
        conn.execute(DELETE_GROUP_ENTRIES, [group.0])?;
        entries
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                Self::insert_entry(conn, EntryOwner::ClassGroup(group), position, entry)
            })
            .collect()
    }

    /// Loads a person's personal timetable: mirrors and direct entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn personal_entries(conn: &Connection, person: PersonId) -> Result<Vec<TimetableEntry>> {
        select_entries(conn, EntryOwner::Person(person))
    }

    /// Appends one entry to a person's personal timetable.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_personal_entry(
        conn: &Connection,
        person: PersonId,
        entry: &TimetableEntry,
    ) -> Result<EntryId> {
        let next: i64 = conn.query_row(NEXT_PERSONAL_POSITION, [person.0], |row| row.get(0))?;
        Self::insert_entry(
            conn,
            EntryOwner::Person(person),
            usize::try_from(next).unwrap_or_default(),
            entry,
        )
    }

    /// Removes every mirror of `group` from the professor's timetable.
    ///
    /// Direct entries are kept. Returns how many rows were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails.
    pub fn unsync_professor_timetable(
        conn: &Connection,
        professor: PersonId,
        group: &ClassGroup,
    ) -> Result<usize> {
        let mut removed = 0;
        for entry in Self::personal_entries(conn, professor)? {
            if !entry.is_mirror_of(group.id, group.course_code()) {
                continue;
            }
            if let Some(id) = entry.id {
                removed += conn.execute(DELETE_ENTRY, [id.0])?;
            }
        }
        log::debug!(
            "unsynced {removed} entries of group {} from professor {professor}",
            group.id
        );
        Ok(removed)
    }

    /// Replaces the professor's mirrors of `group` with fresh copies of its
    /// current schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails.
    pub fn sync_professor_timetable(
        conn: &Connection,
        professor: PersonId,
        group: &ClassGroup,
    ) -> Result<SyncOutcome> {
        let removed = Self::unsync_professor_timetable(conn, professor, group)?;
        let mirrors = mirror_entries(group);
        for mirror in &mirrors {
            Self::add_personal_entry(conn, professor, mirror)?;
        }
        log::debug!(
            "synced {} entries of group {} into professor {professor}",
            mirrors.len(),
            group.id
        );
        Ok(SyncOutcome {
            removed,
            added: mirrors.len(),
        })
    }
}
