//! Plan types for scheduling operations.
//!
//! A plan describes what will be written without touching the database.
//! The executor applies it inside one IMMEDIATE transaction, re-running
//! each action's conflict rule against the rows it sees there.

use crate::class_group::{ClassGroupDetails, ClassGroupId};
use crate::notify::AdminNotification;
use crate::person::PersonId;
use crate::reservation::{Reservation, ReservationStatus};
use crate::timetable::TimetableEntry;

/// Which existing reservations a room write must not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomCheck {
    /// No re-check; the slot did not move.
    Skip,
    /// Every other PENDING or APPROVED reservation.
    Active,
    /// Every other APPROVED reservation; used when approving.
    Approved,
}

/// A class group to be created, members and schedule included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClassGroup {
    /// Descriptive fields.
    pub details: ClassGroupDetails,
    /// Assigned professor.
    pub professor: Option<PersonId>,
    /// Students to enrol.
    pub students: Vec<PersonId>,
    /// Initial schedule.
    pub entries: Vec<TimetableEntry>,
}

/// A single action to be taken during plan execution.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    /// Insert a reservation after re-checking the room.
    CreateReservation(Reservation),

    /// Overwrite a reservation's mutable fields, provided the stored row
    /// still has the status the plan was built against.
    UpdateReservation {
        /// The reservation as it should be stored.
        reservation: Reservation,
        /// Stored status the plan was built against.
        expected: ReservationStatus,
        /// Room re-check to run first.
        check: RoomCheck,
    },

    /// Create a class group, enrol its students, store its schedule and
    /// mirror it to the professor.
    CreateClassGroup(NewClassGroup),

    /// Change descriptive fields and the professor. A professor change
    /// re-checks the schedule against the new professor and moves the
    /// mirrors.
    UpdateClassGroup {
        /// Group to update.
        id: ClassGroupId,
        /// New descriptive fields.
        details: ClassGroupDetails,
        /// New professor.
        professor: Option<PersonId>,
    },

    /// Replace a group's schedule after a batch conflict check and resync
    /// the professor.
    ReplaceTimetable {
        /// Group to update.
        id: ClassGroupId,
        /// The complete new schedule.
        entries: Vec<TimetableEntry>,
    },

    /// Unsync the professor and delete the group.
    DeleteClassGroup(ClassGroupId),

    /// Enrol a student. Never syncs.
    AddStudent {
        /// Target group.
        group: ClassGroupId,
        /// Student to enrol.
        student: PersonId,
    },

    /// Remove a student. Never syncs.
    RemoveStudent {
        /// Target group.
        group: ClassGroupId,
        /// Student to remove.
        student: PersonId,
    },

    /// Rebuild the professor's mirrors of one group.
    SyncProfessor(ClassGroupId),

    /// Tell administrators, after commit.
    NotifyAdmins(AdminNotification),
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateReservation(r) => format!(
                "Create {} reservation {} for classroom {} on {} ({})",
                r.status(),
                r.id(),
                r.classroom(),
                r.date().format("%Y-%m-%d"),
                r.range()
            ),
            Self::UpdateReservation { reservation: r, .. } => format!(
                "Update reservation {} to {} in classroom {} on {} ({})",
                r.id(),
                r.status(),
                r.classroom(),
                r.date().format("%Y-%m-%d"),
                r.range()
            ),
            Self::CreateClassGroup(group) => format!(
                "Create class group {} ({}) with {} entries and {} students",
                group.details.name,
                group.details.course_code,
                group.entries.len(),
                group.students.len()
            ),
            Self::UpdateClassGroup { id, professor, .. } => match professor {
                Some(p) => format!("Update class group {id} taught by person {p}"),
                None => format!("Update class group {id} with no professor"),
            },
            Self::ReplaceTimetable { id, entries } => {
                format!("Replace timetable of class group {id} with {} entries", entries.len())
            }
            Self::DeleteClassGroup(id) => format!("Delete class group {id}"),
            Self::AddStudent { group, student } => {
                format!("Enrol student {student} in class group {group}")
            }
            Self::RemoveStudent { group, student } => {
                format!("Remove student {student} from class group {group}")
            }
            Self::SyncProfessor(id) => format!("Sync professor timetable for class group {id}"),
            Self::NotifyAdmins(n) => format!("Notify admins: {}", n.message()),
        }
    }
}

/// A complete operation plan describing all actions to be taken.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates a new operation plan with the given description.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Enrol student 4");
    /// assert_eq!(plan.description, "Enrol student 4");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    ///
    /// ```
    /// use campus::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Test").add_warning("student already busy");
    /// assert_eq!(plan.warnings.len(), 1);
    /// ```
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}
