//! `SQLite` storage for people, classrooms, class groups, timetables,
//! reservations and the admin notification outbox.
//!
//! Query helpers are associated functions taking a `&Connection`, so they
//! run unchanged on a plain connection or inside a `rusqlite::Transaction`.
//!
//! # Examples
//!
//! ```no_run
//! use campus::database::{Database, DatabaseConfig};
//! use campus::{NewClassroom, Role};
//!
//! let db = Database::open(DatabaseConfig::new("/tmp/campus.db")).unwrap();
//! let room = Database::insert_classroom(
//!     db.connection(),
//!     &NewClassroom {
//!         room_number: "B-204".into(),
//!         kind: "Lecture".into(),
//!         capacity: 40,
//!         features: vec!["projector".into()],
//!     },
//! )
//! .unwrap();
//! println!("stored classroom {}", room.id);
//! let professors = Database::list_persons(db.connection(), Some(Role::Professor)).unwrap();
//! ```

mod class_groups;
mod classrooms;
mod commitments;
mod config;
mod connection;
mod entries;
pub mod migrations;
mod notifications;
mod people;
mod reservations;
mod rows;
mod schema;

#[cfg(test)]
pub(crate) mod test_util;

pub use commitments::DatabaseCommitments;
pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME,
    DATA_DIR_ENV,
};
pub use connection::Database;
pub use notifications::StoredNotification;

pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
