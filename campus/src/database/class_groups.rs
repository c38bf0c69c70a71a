//! Class group queries: header rows, enrolment and schedule loading.

use std::time::SystemTime;

use rusqlite::{params, Connection, OptionalExtension};

use crate::class_group::{ClassGroup, ClassGroupDetails, ClassGroupId};
use crate::error::{Error, Result};
use crate::person::PersonId;

use super::rows::systemtime_to_unix_secs;
use super::Database;

const INSERT_CLASS_GROUP: &str = r"
    INSERT INTO class_groups (
        name, course_code, description, branch_id, academic_year, semester,
        professor_id, created_at, updated_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const UPDATE_CLASS_GROUP: &str = r"
    UPDATE class_groups
    SET name = ?, course_code = ?, description = ?, branch_id = ?,
        academic_year = ?, semester = ?, professor_id = ?, updated_at = ?
    WHERE id = ?
";

const TOUCH_CLASS_GROUP: &str = "UPDATE class_groups SET updated_at = ? WHERE id = ?";

const DELETE_CLASS_GROUP: &str = "DELETE FROM class_groups WHERE id = ?";

const GROUP_COLUMNS: &str =
    "id, name, course_code, description, branch_id, academic_year, semester, professor_id";

const SELECT_STUDENTS: &str = r"
    SELECT student_id FROM class_group_students
    WHERE class_group_id = ?
    ORDER BY student_id
";

const INSERT_STUDENT: &str =
    "INSERT OR IGNORE INTO class_group_students (class_group_id, student_id) VALUES (?, ?)";

const DELETE_STUDENT: &str =
    "DELETE FROM class_group_students WHERE class_group_id = ? AND student_id = ?";

/// Expects the columns of [`GROUP_COLUMNS`] in order. Members and schedule
/// are loaded separately.
fn row_to_group_header(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClassGroup> {
    Ok(ClassGroup {
        id: ClassGroupId(row.get(0)?),
        details: ClassGroupDetails {
            name: row.get(1)?,
            course_code: row.get(2)?,
            description: row.get(3)?,
            branch_id: row.get(4)?,
            academic_year: row.get(5)?,
            semester: row.get(6)?,
        },
        professor: row.get::<_, Option<i64>>(7)?.map(PersonId),
        students: Vec::new(),
        entries: Vec::new(),
    })
}

fn load_members(conn: &Connection, mut group: ClassGroup) -> Result<ClassGroup> {
    let mut stmt = conn.prepare(SELECT_STUDENTS)?;
    group.students = stmt
        .query_map([group.id.0], |row| row.get(0).map(PersonId))?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    group.entries = Database::group_entries(conn, group.id)?;
    Ok(group)
}

fn select_groups(
    conn: &Connection,
    filter: &str,
    param: Option<i64>,
) -> Result<Vec<ClassGroup>> {
    let sql = format!("SELECT {GROUP_COLUMNS} FROM class_groups {filter} ORDER BY course_code, id");
    let mut stmt = conn.prepare(&sql)?;
    let headers = match param {
        Some(value) => stmt.query_map([value], row_to_group_header)?,
        None => stmt.query_map([], row_to_group_header)?,
    }
    .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    headers
        .into_iter()
        .map(|group| load_members(conn, group))
        .collect()
}

impl Database {
    /// Stores a class group header with no students and no schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_class_group(
        conn: &Connection,
        details: &ClassGroupDetails,
        professor: Option<PersonId>,
    ) -> Result<ClassGroup> {
        let now = systemtime_to_unix_secs(SystemTime::now())?;
        conn.execute(
            INSERT_CLASS_GROUP,
            params![
                details.name,
                details.course_code,
                details.description,
                details.branch_id,
                details.academic_year,
                details.semester,
                professor.map(|p| p.0),
                now,
                now,
            ],
        )?;
        Ok(ClassGroup {
            id: ClassGroupId(conn.last_insert_rowid()),
            details: details.clone(),
            professor,
            students: Vec::new(),
            entries: Vec::new(),
        })
    }

    /// Overwrites the descriptive fields and professor of a class group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no row was updated.
    pub fn update_class_group(
        conn: &Connection,
        id: ClassGroupId,
        details: &ClassGroupDetails,
        professor: Option<PersonId>,
    ) -> Result<()> {
        let now = systemtime_to_unix_secs(SystemTime::now())?;
        let changed = conn.execute(
            UPDATE_CLASS_GROUP,
            params![
                details.name,
                details.course_code,
                details.description,
                details.branch_id,
                details.academic_year,
                details.semester,
                professor.map(|p| p.0),
                now,
                id.0,
            ],
        )?;
        if changed == 0 {
            return Err(Error::not_found(format!("class group {id}")));
        }
        Ok(())
    }

    /// Bumps `updated_at` after a schedule or enrolment change.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn touch_class_group(conn: &Connection, id: ClassGroupId) -> Result<()> {
        let now = systemtime_to_unix_secs(SystemTime::now())?;
        conn.execute(TOUCH_CLASS_GROUP, params![now, id.0])?;
        Ok(())
    }

    /// Deletes a class group; enrolment and schedule rows cascade.
    ///
    /// Returns whether a row existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_class_group(conn: &Connection, id: ClassGroupId) -> Result<bool> {
        Ok(conn.execute(DELETE_CLASS_GROUP, [id.0])? > 0)
    }

    /// Loads a class group with its students and schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn get_class_group(conn: &Connection, id: ClassGroupId) -> Result<Option<ClassGroup>> {
        let sql = format!("SELECT {GROUP_COLUMNS} FROM class_groups WHERE id = ?");
        conn.query_row(&sql, [id.0], row_to_group_header)
            .optional()?
            .map(|group| load_members(conn, group))
            .transpose()
    }

    /// Loads a class group, failing with [`Error::NotFound`] when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or a database error.
    pub fn require_class_group(conn: &Connection, id: ClassGroupId) -> Result<ClassGroup> {
        Self::get_class_group(conn, id)?
            .ok_or_else(|| Error::not_found(format!("class group {id}")))
    }

    /// Lists every class group ordered by course code.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn list_class_groups(conn: &Connection) -> Result<Vec<ClassGroup>> {
        select_groups(conn, "", None)
    }

    /// Class groups taught by `professor`.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn class_groups_for_professor(
        conn: &Connection,
        professor: PersonId,
    ) -> Result<Vec<ClassGroup>> {
        select_groups(conn, "WHERE professor_id = ?", Some(professor.0))
    }

    /// Class groups `student` is enrolled in.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn class_groups_for_student(
        conn: &Connection,
        student: PersonId,
    ) -> Result<Vec<ClassGroup>> {
        select_groups(
            conn,
            "WHERE id IN (SELECT class_group_id FROM class_group_students WHERE student_id = ?)",
            Some(student.0),
        )
    }

    /// Enrols a student. Returns `false` if already enrolled.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_student(conn: &Connection, group: ClassGroupId, student: PersonId) -> Result<bool> {
        Ok(conn.execute(INSERT_STUDENT, params![group.0, student.0])? > 0)
    }

    /// Removes a student. Returns `false` if they were not enrolled.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn remove_student(
        conn: &Connection,
        group: ClassGroupId,
        student: PersonId,
    ) -> Result<bool> {
        Ok(conn.execute(DELETE_STUDENT, params![group.0, student.0])? > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, entry, new_person};
    use crate::person::Role;

    #[test]
    fn test_class_group_round_trip() {
        let db = create_test_database();
        let conn = db.connection();
        let prof = Database::insert_person(conn, &new_person("Ada", "Lovelace", Role::Professor))
            .unwrap();
        let student =
            Database::insert_person(conn, &new_person("Alan", "Turing", Role::Student)).unwrap();

        let mut details = ClassGroupDetails::new("Algorithms", "CS201");
        details.semester = Some("S1".into());
        let group = Database::insert_class_group(conn, &details, Some(prof.id)).unwrap();

        assert!(Database::add_student(conn, group.id, student.id).unwrap());
        assert!(!Database::add_student(conn, group.id, student.id).unwrap());
        Database::replace_group_entries(
            conn,
            group.id,
            &[entry("Tuesday", "13:00", "14:30", "Lecture")],
        )
        .unwrap();

        let loaded = Database::require_class_group(conn, group.id).unwrap();
        assert_eq!(loaded.details, details);
        assert_eq!(loaded.professor, Some(prof.id));
        assert_eq!(loaded.students, [student.id]);
        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.entries[0].interval.label(), "Tuesday (13:00 - 14:30)");

        assert_eq!(
            Database::class_groups_for_professor(conn, prof.id).unwrap().len(),
            1
        );
        assert_eq!(
            Database::class_groups_for_student(conn, student.id).unwrap()[0].id,
            group.id
        );
    }

    #[test]
    fn test_delete_class_group_cascades() {
        let db = create_test_database();
        let conn = db.connection();
        let student =
            Database::insert_person(conn, &new_person("Alan", "Turing", Role::Student)).unwrap();
        let group =
            Database::insert_class_group(conn, &ClassGroupDetails::new("Intro", "CS101"), None)
                .unwrap();
        Database::add_student(conn, group.id, student.id).unwrap();
        Database::replace_group_entries(
            conn,
            group.id,
            &[entry("Monday", "09:00", "10:00", "Lecture")],
        )
        .unwrap();

        assert!(Database::delete_class_group(conn, group.id).unwrap());
        assert!(!Database::delete_class_group(conn, group.id).unwrap());
        assert!(Database::class_groups_for_student(conn, student.id)
            .unwrap()
            .is_empty());
        let orphans: i64 = conn
            .query_row("SELECT COUNT(*) FROM timetable_entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_update_missing_group_is_not_found() {
        let db = create_test_database();
        let err = Database::update_class_group(
            db.connection(),
            ClassGroupId(9),
            &ClassGroupDetails::new("X", "X1"),
            None,
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }
}
