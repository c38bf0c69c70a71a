//! Person queries.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::person::{NewPerson, Person, PersonId, Role};

use super::rows::parse_column;
use super::Database;

const INSERT_PERSON: &str =
    "INSERT INTO persons (first_name, last_name, email, role) VALUES (?, ?, ?, ?)";

const SELECT_PERSON: &str =
    "SELECT id, first_name, last_name, email, role FROM persons WHERE id = ?";

const SELECT_PERSON_BY_EMAIL: &str =
    "SELECT id, first_name, last_name, email, role FROM persons WHERE email = ?";

const LIST_PERSONS: &str =
    "SELECT id, first_name, last_name, email, role FROM persons ORDER BY last_name, first_name, id";

const LIST_PERSONS_BY_ROLE: &str = r"
    SELECT id, first_name, last_name, email, role
    FROM persons
    WHERE role = ?
    ORDER BY last_name, first_name, id
";

/// Expects: id, `first_name`, `last_name`, email, role.
pub(super) fn row_to_person(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: PersonId(row.get(0)?),
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        role: parse_column(row, 4)?,
    })
}

fn validate_new_person(person: &NewPerson) -> Result<()> {
    for (field, value) in [
        ("first_name", &person.first_name),
        ("last_name", &person.last_name),
    ] {
        if value.trim().is_empty() {
            return Err(Error::Validation {
                field: field.into(),
                message: "must not be empty".into(),
            });
        }
    }
    if !person.email.contains('@') {
        return Err(Error::Validation {
            field: "email".into(),
            message: format!("'{}' is not an email address", person.email),
        });
    }
    Ok(())
}

impl Database {
    /// Stores a new person and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank names or an email without `@`,
    /// or a database error (including a duplicate email).
    pub fn insert_person(conn: &Connection, person: &NewPerson) -> Result<Person> {
        validate_new_person(person)?;
        conn.execute(
            INSERT_PERSON,
            params![
                person.first_name.trim(),
                person.last_name.trim(),
                person.email.trim(),
                person.role.as_str()
            ],
        )?;
        let id = PersonId(conn.last_insert_rowid());
        log::info!("added {} {id} ({})", person.role, person.email);
        Ok(Person {
            id,
            first_name: person.first_name.trim().to_string(),
            last_name: person.last_name.trim().to_string(),
            email: person.email.trim().to_string(),
            role: person.role,
        })
    }

    /// Looks a person up by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_person(conn: &Connection, id: PersonId) -> Result<Option<Person>> {
        Ok(conn
            .query_row(SELECT_PERSON, [id.0], row_to_person)
            .optional()?)
    }

    /// Looks a person up by id, failing with [`Error::NotFound`] when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or a database error.
    pub fn require_person(conn: &Connection, id: PersonId) -> Result<Person> {
        Self::get_person(conn, id)?.ok_or_else(|| Error::not_found(format!("person {id}")))
    }

    /// Looks a person up by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_person_by_email(conn: &Connection, email: &str) -> Result<Option<Person>> {
        Ok(conn
            .query_row(SELECT_PERSON_BY_EMAIL, [email.trim()], row_to_person)
            .optional()?)
    }

    /// Lists people, optionally restricted to one role, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_persons(conn: &Connection, role: Option<Role>) -> Result<Vec<Person>> {
        let people = if let Some(role) = role {
            let mut stmt = conn.prepare(LIST_PERSONS_BY_ROLE)?;
            let rows = stmt.query_map([role.as_str()], row_to_person)?;
            rows.collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?
        } else {
            let mut stmt = conn.prepare(LIST_PERSONS)?;
            let rows = stmt.query_map([], row_to_person)?;
            rows.collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?
        };
        Ok(people)
    }
}
