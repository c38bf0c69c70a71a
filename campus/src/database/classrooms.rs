//! Classroom queries.

use rusqlite::{params, Connection, OptionalExtension};

use crate::classroom::{Classroom, ClassroomId, NewClassroom};
use crate::error::{Error, Result};

use super::rows::decode_error;
use super::Database;

const INSERT_CLASSROOM: &str =
    "INSERT INTO classrooms (room_number, kind, capacity, features) VALUES (?, ?, ?, ?)";

const SELECT_CLASSROOM: &str =
    "SELECT id, room_number, kind, capacity, features FROM classrooms WHERE id = ?";

const LIST_CLASSROOMS: &str =
    "SELECT id, room_number, kind, capacity, features FROM classrooms ORDER BY room_number";

/// Expects: id, `room_number`, kind, capacity, features (JSON array).
fn row_to_classroom(row: &rusqlite::Row<'_>) -> rusqlite::Result<Classroom> {
    let features: String = row.get(4)?;
    Ok(Classroom {
        id: ClassroomId(row.get(0)?),
        room_number: row.get(1)?,
        kind: row.get(2)?,
        capacity: row.get(3)?,
        features: serde_json::from_str(&features).map_err(|e| decode_error(4, e))?,
    })
}

impl Database {
    /// Stores a new classroom and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank room number or type, or a
    /// database error (including a duplicate room number).
    pub fn insert_classroom(conn: &Connection, classroom: &NewClassroom) -> Result<Classroom> {
        for (field, value) in [
            ("room_number", &classroom.room_number),
            ("kind", &classroom.kind),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation {
                    field: field.into(),
                    message: "must not be empty".into(),
                });
            }
        }

        conn.execute(
            INSERT_CLASSROOM,
            params![
                classroom.room_number.trim(),
                classroom.kind.trim(),
                classroom.capacity,
                serde_json::to_string(&classroom.features)?
            ],
        )?;
        let id = ClassroomId(conn.last_insert_rowid());
        log::info!("added classroom {id} ({})", classroom.room_number);

        Ok(Classroom {
            id,
            room_number: classroom.room_number.trim().to_string(),
            kind: classroom.kind.trim().to_string(),
            capacity: classroom.capacity,
            features: classroom.features.clone(),
        })
    }

    /// Looks a classroom up by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_classroom(conn: &Connection, id: ClassroomId) -> Result<Option<Classroom>> {
        Ok(conn
            .query_row(SELECT_CLASSROOM, [id.0], row_to_classroom)
            .optional()?)
    }

    /// Looks a classroom up by id, failing with [`Error::NotFound`] when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or a database error.
    pub fn require_classroom(conn: &Connection, id: ClassroomId) -> Result<Classroom> {
        Self::get_classroom(conn, id)?.ok_or_else(|| Error::not_found(format!("classroom {id}")))
    }

    /// Lists all classrooms ordered by room number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_classrooms(conn: &Connection) -> Result<Vec<Classroom>> {
        let mut stmt = conn.prepare(LIST_CLASSROOMS)?;
        let rooms = stmt
            .query_map([], row_to_classroom)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(rooms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, new_classroom};

    #[test]
    fn test_insert_and_list_classrooms() {
        let db = create_test_database();
        let conn = db.connection();

        let mut lab = new_classroom("B-12", "Lab", 24);
        lab.features = vec!["projector".into(), "sinks".into()];
        let lab = Database::insert_classroom(conn, &lab).unwrap();
        Database::insert_classroom(conn, &new_classroom("A-01", "Lecture Hall", 120)).unwrap();

        let loaded = Database::get_classroom(conn, lab.id).unwrap().unwrap();
        assert_eq!(loaded.features, ["projector", "sinks"]);

        let rooms: Vec<_> = Database::list_classrooms(conn)
            .unwrap()
            .into_iter()
            .map(|c| c.room_number)
            .collect();
        assert_eq!(rooms, ["A-01", "B-12"]);
    }

    #[test]
    fn test_require_missing_classroom() {
        let db = create_test_database();
        let err = Database::require_classroom(db.connection(), ClassroomId(42)).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("classroom 42"));
    }

    #[test]
    fn test_blank_room_number_rejected() {
        let db = create_test_database();
        let err = Database::insert_classroom(db.connection(), &new_classroom(" ", "Lab", 10))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { field, .. } if field == "room_number"));
    }
}
