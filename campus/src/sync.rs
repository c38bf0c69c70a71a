//! Mirroring of class-group schedules into professors' personal timetables.
//!
//! A professor's personal timetable holds entries they created directly
//! plus one mirrored copy of every entry of every class group they teach.
//! Mirrors carry the source class group id and a `"<courseCode>: "` title
//! prefix. [`sync`] and [`unsync`] operate on an in-memory timetable; the
//! storage layer applies the same plan to rows inside a write transaction.

use crate::class_group::ClassGroup;
use crate::timetable::TimetableEntry;

/// What a sync pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Mirrored entries removed.
    pub removed: usize,
    /// Mirrored entries added.
    pub added: usize,
}

/// Builds the mirrored copies of `group`'s schedule.
///
/// # Examples
///
/// ```
/// use campus::class_group::{ClassGroup, ClassGroupDetails, ClassGroupId};
/// use campus::sync::mirror_entries;
/// use campus::{TimeInterval, TimetableEntry};
///
/// let group = ClassGroup {
///     id: ClassGroupId(1),
///     details: ClassGroupDetails::new("Intro", "CS101"),
///     professor: None,
///     students: Vec::new(),
///     entries: vec![TimetableEntry::new(
///         TimeInterval::parse("Monday", "09:00", "10:00").unwrap(),
///         "Lecture",
///     )],
/// };
/// let mirrors = mirror_entries(&group);
/// assert_eq!(mirrors[0].title, "CS101: Lecture");
/// assert_eq!(mirrors[0].source_class_group, Some(ClassGroupId(1)));
/// ```
#[must_use]
pub fn mirror_entries(group: &ClassGroup) -> Vec<TimetableEntry> {
    let prefix = group.mirror_prefix();
    group
        .entries
        .iter()
        .map(|entry| TimetableEntry {
            id: None,
            interval: entry.interval,
            title: format!("{prefix}{}", entry.title),
            instructor: entry.instructor.clone(),
            location: entry.location.clone(),
            color: entry.color.clone(),
            kind: entry.kind.clone(),
            subject: entry.subject.clone(),
            source_class_group: Some(group.id),
        })
        .collect()
}

/// Removes every mirror of `group` from `personal`.
///
/// Entries the professor created directly are untouched.
pub fn unsync(personal: &mut Vec<TimetableEntry>, group: &ClassGroup) -> usize {
    let before = personal.len();
    personal.retain(|entry| !entry.is_mirror_of(group.id, group.course_code()));
    before - personal.len()
}

/// Replaces the mirrors of `group` in `personal` with fresh copies.
///
/// Running it twice with the same inputs leaves the same timetable.
pub fn sync(personal: &mut Vec<TimetableEntry>, group: &ClassGroup) -> SyncOutcome {
    let removed = unsync(personal, group);
    let mirrors = mirror_entries(group);
    let added = mirrors.len();
    personal.extend(mirrors);
    SyncOutcome { removed, added }
}

#[cfg(all(test, feature = "property-tests"))]
mod proptests;
