//! Bookable rooms.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Database identity of a classroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassroomId(pub i64);

impl fmt::Display for ClassroomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A room that can be reserved. Read-only for the scheduling engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    /// Identity.
    pub id: ClassroomId,
    /// Room number as shown on the door.
    pub room_number: String,
    /// Category (lecture hall, lab, ...).
    pub kind: String,
    /// Seat count.
    pub capacity: u32,
    /// Equipment tags.
    pub features: Vec<String>,
}

impl Classroom {
    /// Whether the room satisfies an availability search filter.
    ///
    /// An absent or empty `kind` matches any room.
    #[must_use]
    pub fn matches(&self, kind: Option<&str>, min_capacity: u32) -> bool {
        let kind_ok = kind.map_or(true, |k| k.is_empty() || self.kind == k);
        kind_ok && self.capacity >= min_capacity
    }
}

/// Input for registering a classroom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClassroom {
    /// Room number.
    pub room_number: String,
    /// Category.
    pub kind: String,
    /// Seat count.
    pub capacity: u32,
    /// Equipment tags.
    pub features: Vec<String>,
}
