//! Class groups: a course section with a professor, students and a schedule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::person::PersonId;
use crate::reservation::ValidationError;
use crate::timetable::TimetableEntry;

/// Database identity of a class group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassGroupId(pub i64);

impl fmt::Display for ClassGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Title prefix carried by entries mirrored from a course.
///
/// # Examples
///
/// ```
/// use campus::class_group::mirror_prefix;
///
/// assert_eq!(mirror_prefix("CS101"), "CS101: ");
/// ```
#[must_use]
pub fn mirror_prefix(course_code: &str) -> String {
    format!("{course_code}: ")
}

/// Descriptive fields of a class group, used for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroupDetails {
    /// Display name.
    pub name: String,
    /// Course code; also the mirror tag on professors' timetables.
    pub course_code: String,
    /// Free text.
    pub description: Option<String>,
    /// Owning branch.
    pub branch_id: Option<i64>,
    /// e.g. `2024-2025`.
    pub academic_year: Option<String>,
    /// e.g. `S1`.
    pub semester: Option<String>,
}

impl ClassGroupDetails {
    /// Creates details with a name and course code.
    #[must_use]
    pub fn new(name: impl Into<String>, course_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            course_code: course_code.into(),
            ..Self::default()
        }
    }

    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the name or course code is blank,
    /// or the course code contains a `:` (which would break mirror tagging).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "cannot be empty"));
        }
        if self.course_code.trim().is_empty() {
            return Err(ValidationError::new("course_code", "cannot be empty"));
        }
        if self.course_code.contains(':') {
            return Err(ValidationError::new("course_code", "cannot contain ':'"));
        }
        Ok(())
    }
}

/// A stored class group with its members and schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroup {
    /// Identity.
    pub id: ClassGroupId,
    /// Descriptive fields.
    #[serde(flatten)]
    pub details: ClassGroupDetails,
    /// Assigned professor.
    pub professor: Option<PersonId>,
    /// Enrolled students, unique.
    pub students: Vec<PersonId>,
    /// Weekly schedule, owned exclusively by this group.
    pub entries: Vec<TimetableEntry>,
}

impl ClassGroup {
    /// The course code.
    #[must_use]
    pub fn course_code(&self) -> &str {
        &self.details.course_code
    }

    /// Title prefix of this group's mirrored entries.
    #[must_use]
    pub fn mirror_prefix(&self) -> String {
        mirror_prefix(&self.details.course_code)
    }

    /// Whether `student` is enrolled.
    #[must_use]
    pub fn has_student(&self, student: PersonId) -> bool {
        self.students.contains(&student)
    }
}
