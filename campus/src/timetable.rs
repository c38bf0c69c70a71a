//! Recurring weekly timetable entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::class_group::{mirror_prefix, ClassGroupId};
use crate::interval::TimeInterval;
use crate::person::PersonId;

/// Colour given to entries created without one.
pub const DEFAULT_COLOR: &str = "#6366f1";

/// Category given to entries created without one.
pub const DEFAULT_KIND: &str = "Lecture";

/// Database identity of a timetable entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum EntryOwner {
    /// Part of a class group's schedule.
    ClassGroup(ClassGroupId),
    /// Part of a professor's personal timetable.
    Person(PersonId),
}

/// One recurring weekly slot.
///
/// # Examples
///
/// ```
/// use campus::{TimeInterval, TimetableEntry};
///
/// let entry = TimetableEntry::new(
///     TimeInterval::parse("Monday", "09:00", "10:00").unwrap(),
///     "Intro lecture",
/// )
/// .with_location("B-204");
///
/// assert_eq!(entry.color, "#6366f1");
/// assert_eq!(entry.kind, "Lecture");
/// assert_eq!(entry.location.as_deref(), Some("B-204"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    /// Identity, `None` until stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    /// When the slot recurs.
    #[serde(flatten)]
    pub interval: TimeInterval,
    /// Display title.
    pub title: String,
    /// Instructor label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    /// Room or place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Display colour.
    #[serde(default = "default_color")]
    pub color: String,
    /// Category (Lecture, Lab, ...).
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Optional subject reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Set on mirrored entries: the class group this entry was copied from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_class_group: Option<ClassGroupId>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_kind() -> String {
    DEFAULT_KIND.to_string()
}

impl TimetableEntry {
    /// Creates an unsaved entry with default colour and category.
    #[must_use]
    pub fn new(interval: TimeInterval, title: impl Into<String>) -> Self {
        Self {
            id: None,
            interval,
            title: title.into(),
            instructor: None,
            location: None,
            color: default_color(),
            kind: default_kind(),
            subject: None,
            source_class_group: None,
        }
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the instructor label.
    #[must_use]
    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    /// Sets the colour.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Sets the subject reference.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Whether this entry mirrors the given class group.
    ///
    /// Rows carrying a back-reference match on it alone, since several
    /// groups may share a course code. Rows written without one fall back
    /// to the `"<courseCode>: "` title prefix.
    #[must_use]
    pub fn is_mirror_of(&self, group: ClassGroupId, course_code: &str) -> bool {
        match self.source_class_group {
            Some(source) => source == group,
            None => self.has_mirror_prefix(course_code),
        }
    }

    /// Whether the title carries the `"<courseCode>: "` mirror tag.
    #[must_use]
    pub fn has_mirror_prefix(&self, course_code: &str) -> bool {
        self.title.starts_with(&mirror_prefix(course_code))
    }
}
