//! Conflict detection for class-group timetables and classroom bookings.
//!
//! Two detectors live here:
//!
//! - [`ConflictDetector`] is person-centric. It checks candidate weekly
//!   slots against the commitments of every party affected by a class
//!   group (its professor and enrolled students) and groups the hits by
//!   candidate window.
//! - [`has_conflicting_reservation`] is room-centric. It checks a dated
//!   booking against the active reservations of one classroom.
//!
//! Both use the half-open overlap rule from [`crate::interval`].

mod detector;
mod room;

use serde::Serialize;

use crate::interval::{TimeInterval, TimeRange};
use crate::person::{Person, PersonId, Role};

pub use detector::{internal_collisions, CommitmentSource, ConflictDetector, ScheduleSubject};
pub use room::{conflicting_reservations, has_conflicting_reservation};

/// A person affected by a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Party {
    /// Identity.
    pub id: PersonId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
}

impl Party {
    /// `First Last`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl From<&Person> for Party {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id,
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
        }
    }
}

/// All parties that collide with one candidate window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictWindow {
    /// Canonical label built from the candidate, e.g. `Monday (09:00 - 10:00)`.
    pub label: String,
    /// The candidate slot, when the window is a weekly one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<TimeInterval>,
    /// Affected professors, unique by id.
    pub professors: Vec<Party>,
    /// Affected students, unique by id.
    pub students: Vec<Party>,
}

impl ConflictWindow {
    fn new(label: String, interval: Option<TimeInterval>) -> Self {
        Self {
            label,
            interval,
            professors: Vec::new(),
            students: Vec::new(),
        }
    }
}

/// Conflicts grouped by candidate window, in first-hit order.
///
/// An empty report means no candidate collided with anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConflictReport {
    windows: Vec<ConflictWindow>,
}

impl ConflictReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report for a dated room booking that hit an existing reservation.
    #[must_use]
    pub fn for_room(date: chrono::NaiveDate, range: &TimeRange) -> Self {
        let mut report = Self::new();
        report.window_mut(format!("{} ({range})", date.format("%Y-%m-%d")), None);
        report
    }

    /// Whether nothing collided.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Number of conflicting windows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// The windows in first-hit order.
    #[must_use]
    pub fn windows(&self) -> &[ConflictWindow] {
        &self.windows
    }

    /// Looks up a window by label.
    #[must_use]
    pub fn window(&self, label: &str) -> Option<&ConflictWindow> {
        self.windows.iter().find(|w| w.label == label)
    }

    /// Records `person` under the candidate's window.
    ///
    /// Students go to the student bucket, everyone else to the professor
    /// bucket. Re-recording the same person under the same window is a
    /// no-op.
    pub fn record(&mut self, candidate: &TimeInterval, person: &Person) {
        let window = self.window_mut(candidate.label(), Some(*candidate));
        let bucket = if person.role == Role::Student {
            &mut window.students
        } else {
            &mut window.professors
        };
        if !bucket.iter().any(|p| p.id == person.id) {
            bucket.push(Party::from(person));
        }
    }

    /// Ensures a window exists for `candidate` without naming a party.
    pub fn record_window(&mut self, candidate: &TimeInterval) {
        self.window_mut(candidate.label(), Some(*candidate));
    }

    fn window_mut(&mut self, label: String, interval: Option<TimeInterval>) -> &mut ConflictWindow {
        let index = match self.windows.iter().position(|w| w.label == label) {
            Some(index) => index,
            None => {
                self.windows.push(ConflictWindow::new(label, interval));
                self.windows.len() - 1
            }
        };
        &mut self.windows[index]
    }

    /// Distinct professors across all windows.
    #[must_use]
    pub fn professor_count(&self) -> usize {
        Self::distinct(self.windows.iter().flat_map(|w| &w.professors))
    }

    /// Distinct students across all windows.
    #[must_use]
    pub fn student_count(&self) -> usize {
        Self::distinct(self.windows.iter().flat_map(|w| &w.students))
    }

    fn distinct<'a>(parties: impl Iterator<Item = &'a Party>) -> usize {
        let mut ids: Vec<PersonId> = parties.map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Folds another report into this one, keeping window order.
    pub fn merge(&mut self, other: Self) {
        for incoming in other.windows {
            let window = self.window_mut(incoming.label, incoming.interval);
            for party in incoming.professors {
                if !window.professors.iter().any(|p| p.id == party.id) {
                    window.professors.push(party);
                }
            }
            for party in incoming.students {
                if !window.students.iter().any(|p| p.id == party.id) {
                    window.students.push(party);
                }
            }
        }
    }
}
