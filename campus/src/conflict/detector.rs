//! Person-centric conflict detection for class-group schedules.

use crate::class_group::{ClassGroup, ClassGroupId};
use crate::error::{Error, Result};
use crate::interval::TimeInterval;
use crate::person::{Person, PersonId};
use crate::timetable::TimetableEntry;

use super::ConflictReport;

/// Read access to the commitments held by people.
///
/// The SQLite adapter implements this over a connection or an open
/// transaction; tests implement it over plain vectors.
pub trait CommitmentSource {
    /// Looks up a person.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    fn person(&self, id: PersonId) -> Result<Option<Person>>;

    /// Every class group `professor` teaches.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn class_groups_for_professor(&self, professor: PersonId) -> Result<Vec<ClassGroup>>;

    /// Every class group `student` is enrolled in.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn class_groups_for_student(&self, student: PersonId) -> Result<Vec<ClassGroup>>;

    /// The personal timetable of `person` (mirrors included).
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn personal_entries(&self, person: PersonId) -> Result<Vec<TimetableEntry>>;
}

/// What a set of candidate slots is being scheduled for.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleSubject<'a> {
    /// The class group under edit; its own entries are never "existing".
    pub class_group: Option<ClassGroupId>,
    /// Course code used to recognise mirrored personal entries.
    pub course_code: &'a str,
    /// Professor whose commitments are checked.
    pub professor: Option<PersonId>,
    /// Students whose commitments are checked.
    pub students: &'a [PersonId],
}

impl<'a> ScheduleSubject<'a> {
    /// Subject describing an existing class group as currently stored.
    #[must_use]
    pub fn for_group(group: &'a ClassGroup) -> Self {
        Self {
            class_group: Some(group.id),
            course_code: group.course_code(),
            professor: group.professor,
            students: &group.students,
        }
    }

    /// Same subject checked against a different professor.
    #[must_use]
    pub const fn with_professor(mut self, professor: Option<PersonId>) -> Self {
        self.professor = professor;
        self
    }

    /// Same subject checked against a different student set.
    #[must_use]
    pub const fn with_students(mut self, students: &'a [PersonId]) -> Self {
        self.students = students;
        self
    }

    fn describe(&self) -> String {
        match self.class_group {
            Some(id) => format!("class group {id} ({})", self.course_code),
            None => format!("new class group ({})", self.course_code),
        }
    }

    fn is_self(&self, group: &ClassGroup) -> bool {
        self.class_group == Some(group.id)
    }
}

/// Checks candidate weekly slots against everyone a class group affects.
///
/// # Examples
///
/// ```no_run
/// use campus::conflict::{ConflictDetector, ScheduleSubject};
/// use campus::database::DatabaseCommitments;
/// use campus::{Database, DatabaseConfig, PersonId, TimeInterval};
///
/// let db = Database::open(DatabaseConfig::new("/tmp/campus.db")).unwrap();
/// let source = DatabaseCommitments::new(db.connection());
/// let subject = ScheduleSubject {
///     class_group: None,
///     course_code: "CS101",
///     professor: Some(PersonId(1)),
///     students: &[],
/// };
/// let slot = TimeInterval::parse("Monday", "09:00", "10:00").unwrap();
/// let report = ConflictDetector::new(&source).detect_single(&subject, &slot).unwrap();
/// println!("{} conflicting window(s)", report.len());
/// ```
pub struct ConflictDetector<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: CommitmentSource + ?Sized> ConflictDetector<'a, S> {
    /// Creates a detector reading from `source`.
    #[must_use]
    pub const fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Runs detection and returns the grouped conflicts.
    ///
    /// The professor is checked against the other class groups they teach
    /// and their non-mirrored personal entries. Each student is checked
    /// against the other class groups they attend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if a referenced person does not exist,
    /// or a storage error from the source.
    pub fn detect(
        &self,
        subject: &ScheduleSubject<'_>,
        candidates: &[TimeInterval],
    ) -> Result<ConflictReport> {
        let mut report = ConflictReport::new();
        if candidates.is_empty() {
            return Ok(report);
        }

        if let Some(professor_id) = subject.professor {
            let professor = self.require_person(professor_id)?;
            let existing = self.professor_commitments(subject, professor_id)?;
            Self::collect(&mut report, candidates, &existing, &professor);
        }

        for &student_id in subject.students {
            let student = self.require_person(student_id)?;
            let existing = self.student_commitments(subject, student_id)?;
            Self::collect(&mut report, candidates, &existing, &student);
        }

        log::debug!(
            "conflict check for {}: {} candidate(s), {} conflicting window(s)",
            subject.describe(),
            candidates.len(),
            report.len()
        );
        Ok(report)
    }

    /// Batch mode: used before replacing a schedule.
    ///
    /// Candidates that collide with each other are reported too, as
    /// windows without parties.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotUnavailable`] carrying the report when anything
    /// collides, otherwise any error from [`Self::detect`].
    pub fn detect_batch(
        &self,
        subject: &ScheduleSubject<'_>,
        candidates: &[TimeInterval],
    ) -> Result<()> {
        let mut report = ConflictReport::new();
        for (_, later) in internal_collisions(candidates) {
            report.record_window(&candidates[later]);
        }
        report.merge(self.detect(subject, candidates)?);

        if report.is_empty() {
            Ok(())
        } else {
            Err(Error::SlotUnavailable {
                subject: subject.describe(),
                report: Box::new(report),
            })
        }
    }

    /// Single-entry mode: advisory check of one slot. Never fails on
    /// conflicts; the caller decides what to do with the report.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Self::detect`].
    pub fn detect_single(
        &self,
        subject: &ScheduleSubject<'_>,
        candidate: &TimeInterval,
    ) -> Result<ConflictReport> {
        self.detect(subject, std::slice::from_ref(candidate))
    }

    fn require_person(&self, id: PersonId) -> Result<Person> {
        self.source
            .person(id)?
            .ok_or_else(|| Error::not_found(format!("person {id}")))
    }

    fn professor_commitments(
        &self,
        subject: &ScheduleSubject<'_>,
        professor: PersonId,
    ) -> Result<Vec<TimeInterval>> {
        let mut existing: Vec<TimeInterval> = self
            .source
            .class_groups_for_professor(professor)?
            .iter()
            .filter(|group| !subject.is_self(group))
            .flat_map(|group| group.entries.iter().map(|e| e.interval))
            .collect();

        // Mirrors of the group under edit would otherwise collide with
        // the very slots being replaced.
        existing.extend(
            self.source
                .personal_entries(professor)?
                .iter()
                .filter(|entry| match subject.class_group {
                    Some(group) => !entry.is_mirror_of(group, subject.course_code),
                    None => !entry.has_mirror_prefix(subject.course_code),
                })
                .map(|entry| entry.interval),
        );
        Ok(existing)
    }

    fn student_commitments(
        &self,
        subject: &ScheduleSubject<'_>,
        student: PersonId,
    ) -> Result<Vec<TimeInterval>> {
        Ok(self
            .source
            .class_groups_for_student(student)?
            .iter()
            .filter(|group| !subject.is_self(group))
            .flat_map(|group| group.entries.iter().map(|e| e.interval))
            .collect())
    }

    fn collect(
        report: &mut ConflictReport,
        candidates: &[TimeInterval],
        existing: &[TimeInterval],
        party: &Person,
    ) {
        for candidate in candidates {
            if existing.iter().any(|slot| candidate.overlaps(slot)) {
                report.record(candidate, party);
            }
        }
    }
}

/// Index pairs `(i, j)` with `i < j` of candidates that overlap each other.
///
/// # Examples
///
/// ```
/// use campus::conflict::internal_collisions;
/// use campus::TimeInterval;
///
/// let slots = [
///     TimeInterval::parse("Monday", "09:00", "10:00").unwrap(),
///     TimeInterval::parse("Monday", "09:30", "11:00").unwrap(),
///     TimeInterval::parse("Monday", "11:00", "12:00").unwrap(),
/// ];
/// assert_eq!(internal_collisions(&slots), vec![(0, 1)]);
/// ```
#[must_use]
pub fn internal_collisions(candidates: &[TimeInterval]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, a) in candidates.iter().enumerate() {
        for (offset, b) in candidates[i + 1..].iter().enumerate() {
            if a.overlaps(b) {
                pairs.push((i, i + 1 + offset));
            }
        }
    }
    pairs
}
