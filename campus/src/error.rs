//! Error types for the campus library.
//!
//! Every scheduling failure the engine can surface has its own variant so
//! callers can react to it structurally. Infrastructure failures (storage,
//! configuration, I/O) are wrapped via `#[from]` conversions.

use std::path::PathBuf;

use thiserror::Error;

use crate::conflict::ConflictReport;
use crate::person::Role;

/// Result type alias for operations that may fail with a campus error.
///
/// # Examples
///
/// ```
/// use campus::{Error, Result};
///
/// fn example_operation() -> Result<u16> {
///     Ok(540)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the campus library.
#[derive(Debug, Error)]
pub enum Error {
    /// A time, date, or weekday string did not match the expected format.
    #[error("invalid {kind} '{value}': expected {expected}")]
    InvalidFormat {
        /// What was being parsed ("time", "date", "weekday", ...).
        kind: &'static str,
        /// The offending input.
        value: String,
        /// Human-readable description of the accepted format.
        expected: &'static str,
    },

    /// An interval whose end is not after its start.
    #[error("invalid time range {start} - {end}: end must be after start")]
    InvalidTimeRange {
        /// Rendered start time.
        start: String,
        /// Rendered end time.
        end: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// A person was attached to a slot that requires a different role.
    #[error("person {person} has role {actual}, expected {expected}")]
    RoleMismatch {
        /// Identity of the person.
        person: i64,
        /// Role the slot requires.
        expected: Role,
        /// Role the person actually holds.
        actual: Role,
    },

    /// The requested slot collides with existing commitments.
    #[error("slot unavailable for {subject}: {} conflicting window(s)", report.len())]
    SlotUnavailable {
        /// What was being scheduled.
        subject: String,
        /// The grouped conflicts that caused the rejection.
        report: Box<ConflictReport>,
    },

    /// The actor is not allowed to perform the action on this resource.
    #[error("person {actor} is not authorized to {action}")]
    Unauthorized {
        /// Identity of the acting person.
        actor: i64,
        /// The attempted action.
        action: String,
    },

    /// An illegal reservation lifecycle move.
    #[error("invalid transition for reservation {reservation}: {reason}")]
    InvalidTransition {
        /// Identity of the reservation.
        reservation: String,
        /// Why the move is not allowed.
        reason: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A JSON (de)serialization error occurred.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A database lock timeout occurred.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// The on-disk schema version is not the one this build understands.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },
}

impl From<crate::reservation::ValidationError> for Error {
    fn from(err: crate::reservation::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl Error {
    /// Shorthand for a [`Error::NotFound`] with a formatted resource name.
    pub(crate) fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Check if error indicates a missing resource.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus::Error;
    ///
    /// let err = Error::NotFound { resource: "classroom 7".into() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error is a scheduling conflict.
    #[must_use]
    pub fn is_slot_unavailable(&self) -> bool {
        matches!(self, Self::SlotUnavailable { .. })
    }

    /// Returns the conflict report carried by a [`Error::SlotUnavailable`].
    #[must_use]
    pub fn conflict_report(&self) -> Option<&ConflictReport> {
        match self {
            Self::SlotUnavailable { report, .. } => Some(report),
            _ => None,
        }
    }

    /// Check if the underlying `SQLite` error is a busy/locked condition.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Self::Database(rusqlite::Error::SqliteFailure(e, _))
                if matches!(e.code, rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
        )
    }
}
