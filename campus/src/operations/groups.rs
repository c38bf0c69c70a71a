//! Class group writes and the advisory schedule check.
//!
//! Every plan here checks roles and conflicts up front. The executor
//! re-runs the conflict rule and keeps the professor's mirrors in step
//! inside the write transaction.

use crate::class_group::{ClassGroupDetails, ClassGroupId};
use crate::conflict::{ConflictDetector, ConflictReport, ScheduleSubject};
use crate::database::{Database, DatabaseCommitments};
use crate::error::{Error, Result};
use crate::interval::TimeInterval;
use crate::person::{PersonId, Role};
use crate::timetable::TimetableEntry;

use super::checks::{ensure_schedule_free, require_all, require_role, schedule_report};
use super::plan::{NewClassGroup, OperationPlan, PlanAction};

/// Options for creating a class group.
#[derive(Debug, Clone)]
pub struct CreateGroupOptions {
    /// Descriptive fields.
    pub details: ClassGroupDetails,
    /// Professor to assign.
    pub professor: Option<PersonId>,
    /// Students to enrol.
    pub students: Vec<PersonId>,
    /// Initial schedule.
    pub entries: Vec<TimetableEntry>,
}

impl CreateGroupOptions {
    /// A group with no professor, students or schedule.
    #[must_use]
    pub fn new(details: ClassGroupDetails) -> Self {
        Self {
            details,
            professor: None,
            students: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Assigns a professor.
    #[must_use]
    pub const fn with_professor(mut self, professor: Option<PersonId>) -> Self {
        self.professor = professor;
        self
    }

    /// Enrols students.
    #[must_use]
    pub fn with_students(mut self, students: Vec<PersonId>) -> Self {
        self.students = students;
        self
    }

    /// Sets the initial schedule.
    #[must_use]
    pub fn with_entries(mut self, entries: Vec<TimetableEntry>) -> Self {
        self.entries = entries;
        self
    }
}

/// Plans the creation of a class group.
pub struct CreateGroupPlan {
    options: CreateGroupOptions,
}

impl CreateGroupPlan {
    /// Creates a plan.
    #[must_use]
    pub const fn new(options: CreateGroupOptions) -> Self {
        Self { options }
    }

    /// Builds the plan.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad details, [`Error::NotFound`] or
    /// [`Error::RoleMismatch`] for members, or [`Error::SlotUnavailable`]
    /// when the schedule collides with the professor or any student.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let conn = db.connection();
        let opts = &self.options;

        // Step 1: Validate details and roles
        opts.details.validate()?;
        if let Some(professor) = opts.professor {
            require_role(conn, professor, Role::Professor)?;
        }
        require_all(conn, &opts.students, Role::Student)?;

        // Step 2: Batch check of the whole schedule
        let subject = ScheduleSubject {
            class_group: None,
            course_code: &opts.details.course_code,
            professor: opts.professor,
            students: &opts.students,
        };
        ensure_schedule_free(conn, &subject, &opts.entries)?;

        Ok(OperationPlan::new(format!(
            "Create class group {} ({})",
            opts.details.name, opts.details.course_code
        ))
        .add_action(PlanAction::CreateClassGroup(NewClassGroup {
            details: opts.details.clone(),
            professor: opts.professor,
            students: opts.students.clone(),
            entries: opts.entries.clone(),
        })))
    }
}

/// Options for changing a class group's details and professor.
#[derive(Debug, Clone)]
pub struct UpdateGroupOptions {
    /// Target group.
    pub id: ClassGroupId,
    /// New details; `None` keeps the stored ones.
    pub details: Option<ClassGroupDetails>,
    /// New professor; `None` removes the professor.
    pub professor: Option<PersonId>,
}

impl UpdateGroupOptions {
    /// Replaces the details and professor.
    #[must_use]
    pub const fn new(
        id: ClassGroupId,
        details: ClassGroupDetails,
        professor: Option<PersonId>,
    ) -> Self {
        Self {
            id,
            details: Some(details),
            professor,
        }
    }

    /// Only changes the professor.
    #[must_use]
    pub const fn assign_professor(id: ClassGroupId, professor: Option<PersonId>) -> Self {
        Self {
            id,
            details: None,
            professor,
        }
    }
}

/// Plans an update or professor assignment.
pub struct UpdateGroupPlan {
    options: UpdateGroupOptions,
}

impl UpdateGroupPlan {
    /// Creates a plan.
    #[must_use]
    pub const fn new(options: UpdateGroupOptions) -> Self {
        Self { options }
    }

    /// Builds the plan.
    ///
    /// A new professor is checked against the group's current schedule
    /// before anything moves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::RoleMismatch`], a validation
    /// error, or [`Error::SlotUnavailable`] when the new professor is busy.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let conn = db.connection();
        let opts = &self.options;

        let current = Database::require_class_group(conn, opts.id)?;
        let details = opts
            .details
            .clone()
            .unwrap_or_else(|| current.details.clone());
        details.validate()?;

        let mut plan = OperationPlan::new(format!("Update class group {}", opts.id));
        if let Some(professor) = opts.professor {
            require_role(conn, professor, Role::Professor)?;
            if current.professor != Some(professor) {
                let subject = ScheduleSubject::for_group(&current)
                    .with_professor(Some(professor))
                    .with_students(&[]);
                ensure_schedule_free(conn, &subject, &current.entries)?;
            }
        } else if current.professor.is_some() {
            plan = plan.add_warning(format!(
                "class group {} will have no professor",
                current.id
            ));
        }

        Ok(plan.add_action(PlanAction::UpdateClassGroup {
            id: opts.id,
            details,
            professor: opts.professor,
        }))
    }
}

/// Plans replacing a class group's whole weekly schedule.
pub struct ScheduleGroupPlan {
    id: ClassGroupId,
    entries: Vec<TimetableEntry>,
}

impl ScheduleGroupPlan {
    /// Creates a plan that stores `entries` as the group's schedule.
    #[must_use]
    pub const fn new(id: ClassGroupId, entries: Vec<TimetableEntry>) -> Self {
        Self { id, entries }
    }

    /// Builds the plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or [`Error::SlotUnavailable`] when the
    /// new schedule collides with itself, the professor or a student.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let conn = db.connection();
        let current = Database::require_class_group(conn, self.id)?;
        ensure_schedule_free(conn, &ScheduleSubject::for_group(&current), &self.entries)?;

        let mut plan = OperationPlan::new(format!("Schedule class group {}", self.id));
        if self.entries.is_empty() {
            plan = plan.add_warning(format!("class group {} will have no entries", self.id));
        }
        Ok(plan.add_action(PlanAction::ReplaceTimetable {
            id: self.id,
            entries: self.entries.clone(),
        }))
    }
}

/// Plans deleting a class group.
pub struct DeleteGroupPlan {
    id: ClassGroupId,
}

impl DeleteGroupPlan {
    /// Creates a plan.
    #[must_use]
    pub const fn new(id: ClassGroupId) -> Self {
        Self { id }
    }

    /// Builds the plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the group does not exist.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let group = Database::require_class_group(db.connection(), self.id)?;
        let mut plan = OperationPlan::new(format!(
            "Delete class group {} ({})",
            group.id,
            group.course_code()
        ));
        if !group.students.is_empty() {
            plan = plan.add_warning(format!(
                "{} student(s) will be unenrolled",
                group.students.len()
            ));
        }
        Ok(plan.add_action(PlanAction::DeleteClassGroup(self.id)))
    }
}

/// Plans enrolling one student.
pub struct EnrollPlan {
    group: ClassGroupId,
    student: PersonId,
}

impl EnrollPlan {
    /// Creates a plan.
    #[must_use]
    pub const fn new(group: ClassGroupId, student: PersonId) -> Self {
        Self { group, student }
    }

    /// Builds the plan.
    ///
    /// Collisions with the student's other groups become warnings; they do
    /// not block the enrolment. Enrolling someone already enrolled yields
    /// an empty plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or [`Error::RoleMismatch`].
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let conn = db.connection();
        let group = Database::require_class_group(conn, self.group)?;
        require_role(conn, self.student, Role::Student)?;

        let mut plan = OperationPlan::new(format!(
            "Enrol student {} in class group {}",
            self.student, self.group
        ));
        if group.has_student(self.student) {
            return Ok(plan.add_warning(format!(
                "student {} is already enrolled in class group {}",
                self.student, self.group
            )));
        }

        let students = [self.student];
        let subject = ScheduleSubject::for_group(&group)
            .with_professor(None)
            .with_students(&students);
        let report = schedule_report(conn, &subject, &group.entries)?;
        for window in report.windows() {
            plan = plan.add_warning(format!("student {} is busy on {}", self.student, window.label));
        }

        Ok(plan.add_action(PlanAction::AddStudent {
            group: self.group,
            student: self.student,
        }))
    }
}

/// Plans removing one student.
pub struct UnenrollPlan {
    group: ClassGroupId,
    student: PersonId,
}

impl UnenrollPlan {
    /// Creates a plan.
    #[must_use]
    pub const fn new(group: ClassGroupId, student: PersonId) -> Self {
        Self { group, student }
    }

    /// Builds the plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the group does not exist or the
    /// student is not enrolled.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let group = Database::require_class_group(db.connection(), self.group)?;
        if !group.has_student(self.student) {
            return Err(Error::not_found(format!(
                "student {} in class group {}",
                self.student, self.group
            )));
        }
        Ok(OperationPlan::new(format!(
            "Remove student {} from class group {}",
            self.student, self.group
        ))
        .add_action(PlanAction::RemoveStudent {
            group: self.group,
            student: self.student,
        }))
    }
}

/// Plans rebuilding every mirror on one professor's timetable.
pub struct ResyncPlan {
    professor: PersonId,
}

impl ResyncPlan {
    /// Creates a plan.
    #[must_use]
    pub const fn new(professor: PersonId) -> Self {
        Self { professor }
    }

    /// Builds the plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or [`Error::RoleMismatch`].
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let conn = db.connection();
        require_role(conn, self.professor, Role::Professor)?;
        let groups = Database::class_groups_for_professor(conn, self.professor)?;

        let mut plan = OperationPlan::new(format!("Resync timetable of professor {}", self.professor));
        if groups.is_empty() {
            plan = plan.add_warning(format!("professor {} teaches no class groups", self.professor));
        }
        for group in &groups {
            plan = plan.add_action(PlanAction::SyncProfessor(group.id));
        }
        Ok(plan)
    }
}

/// Advisory check of a class group's schedule, or of one proposed slot.
///
/// Never fails on conflicts; the report says what collides and with whom.
///
/// # Errors
///
/// Returns [`Error::NotFound`] or a database error.
pub fn check_group_schedule(
    db: &Database,
    group: ClassGroupId,
    candidate: Option<&TimeInterval>,
) -> Result<ConflictReport> {
    let conn = db.connection();
    let group = Database::require_class_group(conn, group)?;
    let subject = ScheduleSubject::for_group(&group);
    match candidate {
        Some(slot) => {
            let source = DatabaseCommitments::new(conn);
            ConflictDetector::new(&source).detect_single(&subject, slot)
        }
        None => schedule_report(conn, &subject, &group.entries),
    }
}
