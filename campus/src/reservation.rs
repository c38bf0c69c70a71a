//! Classroom reservation types and the reservation status machine.
//!
//! A [`Reservation`] books one classroom on one calendar date for a
//! half-open time range. Reservations are never deleted; they move through
//! [`ReservationStatus`] according to a fixed transition table.

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classroom::ClassroomId;
use crate::error::Error;
use crate::interval::TimeRange;
use crate::person::PersonId;

/// Identity of a reservation (a UUID string).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(String);

impl ReservationId {
    /// Generates a fresh random identity.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wraps an existing identity.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReservationStatus {
    /// Awaiting administrator review.
    Pending,
    /// Confirmed.
    Approved,
    /// Withdrawn by the requester.
    Canceled,
    /// Refused by an administrator.
    Rejected,
}

impl ReservationStatus {
    /// Every status.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Approved, Self::Canceled, Self::Rejected];

    /// The legal `(from, to)` moves. Nothing else is allowed.
    pub const TRANSITIONS: [(Self, Self); 4] = [
        (Self::Pending, Self::Approved),
        (Self::Pending, Self::Rejected),
        (Self::Pending, Self::Canceled),
        (Self::Approved, Self::Canceled),
    ];

    /// Statuses that occupy their room slot.
    pub const ACTIVE: [Self; 2] = [Self::Pending, Self::Approved];

    /// Storage and display form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Canceled => "CANCELED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Whether the reservation still holds its slot.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Whether `self -> to` appears in [`Self::TRANSITIONS`].
    ///
    /// # Examples
    ///
    /// ```
    /// use campus::ReservationStatus;
    ///
    /// assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Approved));
    /// assert!(!ReservationStatus::Rejected.can_transition_to(ReservationStatus::Canceled));
    /// ```
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        Self::TRANSITIONS.contains(&(self, to))
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidFormat {
                kind: "reservation status",
                value: s.to_string(),
                expected: "PENDING, APPROVED, CANCELED or REJECTED",
            })
    }
}

/// A dated classroom booking.
///
/// # Examples
///
/// ```
/// use campus::{ClassroomId, PersonId, Reservation, ReservationStatus, TimeRange};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
/// let range = TimeRange::parse("14:00", "15:00").unwrap();
///
/// let reservation = Reservation::builder(PersonId(1), ClassroomId(2), date, range)
///     .purpose(Some("Thesis defense".to_string()))
///     .build()
///     .unwrap();
///
/// assert_eq!(reservation.status(), ReservationStatus::Pending);
/// assert_eq!(reservation.purpose(), Some("Thesis defense"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    owner: PersonId,
    classroom: ClassroomId,
    date: NaiveDate,
    #[serde(flatten)]
    range: TimeRange,
    purpose: Option<String>,
    notes: Option<String>,
    status: ReservationStatus,
    created_at: SystemTime,
    updated_at: SystemTime,
}

impl Reservation {
    /// Creates a new reservation builder.
    #[must_use]
    pub fn builder(
        owner: PersonId,
        classroom: ClassroomId,
        date: NaiveDate,
        range: TimeRange,
    ) -> ReservationBuilder {
        ReservationBuilder {
            id: None,
            owner,
            classroom,
            date,
            range,
            purpose: None,
            notes: None,
            status: ReservationStatus::Pending,
            created_at: None,
            updated_at: None,
        }
    }

    /// Identity.
    #[must_use]
    pub const fn id(&self) -> &ReservationId {
        &self.id
    }

    /// The requesting person.
    #[must_use]
    pub const fn owner(&self) -> PersonId {
        self.owner
    }

    /// The booked room.
    #[must_use]
    pub const fn classroom(&self) -> ClassroomId {
        self.classroom
    }

    /// The booked date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// The booked time range.
    #[must_use]
    pub const fn range(&self) -> TimeRange {
        self.range
    }

    /// Stated purpose.
    #[must_use]
    pub fn purpose(&self) -> Option<&str> {
        self.purpose.as_deref()
    }

    /// Free-text notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Last modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> SystemTime {
        self.updated_at
    }

    /// Whether this reservation holds `classroom` on `date` during `range`.
    #[must_use]
    pub fn occupies(&self, classroom: ClassroomId, date: NaiveDate, range: &TimeRange) -> bool {
        self.status.is_active()
            && self.classroom == classroom
            && self.date == date
            && self.range.overlaps(range)
    }

    /// Moves to `to` if the transition table allows it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] for any move not listed in
    /// [`ReservationStatus::TRANSITIONS`].
    pub fn transition(&mut self, to: ReservationStatus) -> Result<(), Error> {
        if !self.status.can_transition_to(to) {
            return Err(Error::InvalidTransition {
                reservation: self.id.to_string(),
                reason: format!("{} cannot move to {}", self.status, to),
            });
        }
        self.status = to;
        self.updated_at = SystemTime::now();
        Ok(())
    }

    /// Replaces the booked slot and descriptive text.
    ///
    /// Leaves identity, owner and status untouched.
    pub fn reschedule(&mut self, change: Reschedule) {
        self.classroom = change.classroom;
        self.date = change.date;
        self.range = change.range;
        self.purpose = change.purpose;
        if change.notes.is_some() {
            self.notes = change.notes;
        }
        self.updated_at = SystemTime::now();
    }
}

/// New slot and text for an edited reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reschedule {
    /// Room.
    pub classroom: ClassroomId,
    /// Date.
    pub date: NaiveDate,
    /// Time range.
    pub range: TimeRange,
    /// Replacement purpose.
    pub purpose: Option<String>,
    /// Replacement notes; `None` keeps the existing notes.
    pub notes: Option<String>,
}

/// Builder for creating `Reservation` instances.
#[derive(Debug)]
pub struct ReservationBuilder {
    id: Option<ReservationId>,
    owner: PersonId,
    classroom: ClassroomId,
    date: NaiveDate,
    range: TimeRange,
    purpose: Option<String>,
    notes: Option<String>,
    status: ReservationStatus,
    created_at: Option<SystemTime>,
    updated_at: Option<SystemTime>,
}

impl ReservationBuilder {
    /// Uses an existing identity instead of generating one.
    #[must_use]
    pub fn id(mut self, id: ReservationId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the purpose. Trimmed of surrounding whitespace.
    #[must_use]
    pub fn purpose(mut self, purpose: Option<String>) -> Self {
        self.purpose = purpose.map(|p| p.trim().to_string());
        self
    }

    /// Sets the notes. Trimmed of surrounding whitespace.
    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.map(|n| n.trim().to_string());
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn status(mut self, status: ReservationStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub fn created_at(mut self, created_at: SystemTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the last modification timestamp.
    #[must_use]
    pub fn updated_at(mut self, updated_at: SystemTime) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Builds the reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the purpose or notes are provided but empty
    /// after trimming.
    pub fn build(self) -> Result<Reservation, ValidationError> {
        if self.purpose.as_deref().is_some_and(str::is_empty) {
            return Err(ValidationError::new(
                "purpose",
                "purpose must be non-empty after trimming whitespace",
            ));
        }
        if self.notes.as_deref().is_some_and(str::is_empty) {
            return Err(ValidationError::new(
                "notes",
                "notes must be non-empty after trimming whitespace",
            ));
        }

        let now = SystemTime::now();
        let created_at = self.created_at.unwrap_or(now);
        Ok(Reservation {
            id: self.id.unwrap_or_else(ReservationId::generate),
            owner: self.owner,
            classroom: self.classroom,
            date: self.date,
            range: self.range,
            purpose: self.purpose,
            notes: self.notes,
            status: self.status,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        })
    }
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(all(test, feature = "property-tests"))]
mod proptests;
