//! Plan execution engine.
//!
//! Every plan runs in one IMMEDIATE transaction. Conflict rules are
//! re-checked against the rows visible inside that transaction, so two
//! writers planning against the same snapshot cannot both commit an
//! overlapping slot. Admin notifications go out after commit.

use rusqlite::{Connection, TransactionBehavior};

use crate::class_group::ClassGroupId;
use crate::conflict::ScheduleSubject;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::notify::{deliver, AdminNotification, LogNotifier, Notifier};
use crate::reservation::ReservationId;

use super::checks::{ensure_room_free, ensure_schedule_free};
use super::plan::{OperationPlan, PlanAction, RoomCheck};

/// Result of executing a plan.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Whether this was a dry-run (no actual changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were taken (or would be taken in dry-run).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// Class group created by the plan, if any.
    pub class_group: Option<ClassGroupId>,

    /// Reservation created or updated by the plan, if any.
    pub reservation: Option<ReservationId>,

    /// Notifications delivered without error.
    pub notifications_delivered: usize,
}

impl ExecutionResult {
    fn new(plan: &OperationPlan, dry_run: bool) -> Self {
        Self {
            success: true,
            dry_run,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            class_group: None,
            reservation: Self::reservation_in(plan),
            notifications_delivered: 0,
        }
    }

    fn reservation_in(plan: &OperationPlan) -> Option<ReservationId> {
        plan.actions.iter().find_map(|action| match action {
            PlanAction::CreateReservation(r) | PlanAction::UpdateReservation { reservation: r, .. } => {
                Some(r.id().clone())
            }
            _ => None,
        })
    }
}

/// Executes operation plans against the database.
///
/// # Examples
///
/// ```no_run
/// use campus::operations::{OperationPlan, PlanExecutor};
/// use campus::{Database, DatabaseConfig};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/campus.db")).unwrap();
/// let plan = OperationPlan::new("Nothing to do");
///
/// let result = PlanExecutor::new(&mut db).dry_run().execute(&plan).unwrap();
/// assert!(result.dry_run);
/// ```
pub struct PlanExecutor<'a> {
    db: &'a mut Database,
    notifier: &'a dyn Notifier,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates an executor that logs notifications.
    #[must_use]
    pub fn new(db: &'a mut Database) -> Self {
        Self {
            db,
            notifier: &LogNotifier,
            dry_run: false,
        }
    }

    /// Delivers admin notifications through `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: &'a dyn Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Validates nothing further and writes nothing.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`] if the write lock cannot be taken in
    /// time, [`Error::SlotUnavailable`] if a re-check fails, or any error
    /// from an individual action. Nothing is written on error.
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::new(plan, self.dry_run);
        if self.dry_run {
            return Ok(result);
        }

        let seconds = self.db.config().busy_timeout.as_secs();
        let mut pending = Vec::new();
        {
            let tx = self
                .db
                .connection_mut()
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|e| lock_error(e.into(), seconds))?;

            for action in &plan.actions {
                apply(&tx, action, &mut result, &mut pending)
                    .map_err(|e| lock_error(e, seconds))?;
            }
            tx.commit().map_err(|e| lock_error(e.into(), seconds))?;
        }
        log::info!("{}: {} action(s) committed", plan.description, plan.len());

        result.notifications_delivered = pending
            .iter()
            .filter(|n| deliver(self.notifier, n))
            .count();
        Ok(result)
    }
}

fn lock_error(err: Error, seconds: u64) -> Error {
    if err.is_busy() {
        Error::LockTimeout { seconds }
    } else {
        err
    }
}

fn apply(
    conn: &Connection,
    action: &PlanAction,
    result: &mut ExecutionResult,
    pending: &mut Vec<AdminNotification>,
) -> Result<()> {
    match action {
        PlanAction::CreateReservation(r) => {
            ensure_room_free(
                conn,
                r.classroom(),
                r.date(),
                &r.range(),
                Some(r.id()),
                RoomCheck::Active,
            )?;
            Database::insert_reservation(conn, r)?;
            result.reservation = Some(r.id().clone());
        }
        PlanAction::UpdateReservation {
            reservation: r,
            expected,
            check,
        } => {
            let stored = Database::require_reservation(conn, r.id())?;
            if stored.status() != *expected {
                return Err(Error::InvalidTransition {
                    reservation: r.id().to_string(),
                    reason: format!(
                        "it moved from {expected} to {} since this change was planned",
                        stored.status()
                    ),
                });
            }
            ensure_room_free(conn, r.classroom(), r.date(), &r.range(), Some(r.id()), *check)?;
            Database::update_reservation(conn, r)?;
            result.reservation = Some(r.id().clone());
        }
        PlanAction::CreateClassGroup(new) => {
            let subject = ScheduleSubject {
                class_group: None,
                course_code: &new.details.course_code,
                professor: new.professor,
                students: &new.students,
            };
            ensure_schedule_free(conn, &subject, &new.entries)?;

            let group = Database::insert_class_group(conn, &new.details, new.professor)?;
            for student in &new.students {
                Database::add_student(conn, group.id, *student)?;
            }
            Database::replace_group_entries(conn, group.id, &new.entries)?;
            if let Some(professor) = new.professor {
                let stored = Database::require_class_group(conn, group.id)?;
                Database::sync_professor_timetable(conn, professor, &stored)?;
            }
            result.class_group = Some(group.id);
        }
        PlanAction::UpdateClassGroup {
            id,
            details,
            professor,
        } => {
            let current = Database::require_class_group(conn, *id)?;
            if let Some(new_professor) = professor.filter(|p| current.professor != Some(*p)) {
                let subject = ScheduleSubject::for_group(&current)
                    .with_professor(Some(new_professor))
                    .with_students(&[]);
                ensure_schedule_free(conn, &subject, &current.entries)?;
            }

            if let Some(old) = current.professor {
                Database::unsync_professor_timetable(conn, old, &current)?;
            }
            Database::update_class_group(conn, *id, details, *professor)?;
            let updated = Database::require_class_group(conn, *id)?;
            if let Some(professor) = updated.professor {
                Database::sync_professor_timetable(conn, professor, &updated)?;
            }
            result.class_group = Some(*id);
        }
        PlanAction::ReplaceTimetable { id, entries } => {
            let current = Database::require_class_group(conn, *id)?;
            ensure_schedule_free(conn, &ScheduleSubject::for_group(&current), entries)?;

            if let Some(professor) = current.professor {
                Database::unsync_professor_timetable(conn, professor, &current)?;
            }
            Database::replace_group_entries(conn, *id, entries)?;
            Database::touch_class_group(conn, *id)?;
            let updated = Database::require_class_group(conn, *id)?;
            if let Some(professor) = updated.professor {
                Database::sync_professor_timetable(conn, professor, &updated)?;
            }
            result.class_group = Some(*id);
        }
        PlanAction::DeleteClassGroup(id) => {
            let current = Database::require_class_group(conn, *id)?;
            if let Some(professor) = current.professor {
                Database::unsync_professor_timetable(conn, professor, &current)?;
            }
            Database::delete_class_group(conn, *id)?;
        }
        PlanAction::AddStudent { group, student } => {
            Database::require_class_group(conn, *group)?;
            Database::add_student(conn, *group, *student)?;
            Database::touch_class_group(conn, *group)?;
            result.class_group = Some(*group);
        }
        PlanAction::RemoveStudent { group, student } => {
            if !Database::remove_student(conn, *group, *student)? {
                return Err(Error::not_found(format!(
                    "student {student} in class group {group}"
                )));
            }
            Database::touch_class_group(conn, *group)?;
            result.class_group = Some(*group);
        }
        PlanAction::SyncProfessor(id) => {
            let group = Database::require_class_group(conn, *id)?;
            if let Some(professor) = group.professor {
                Database::sync_professor_timetable(conn, professor, &group)?;
            }
        }
        PlanAction::NotifyAdmins(notification) => pending.push(notification.clone()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::class_group::ClassGroupDetails;
    use crate::database::test_util::{create_test_database, date, entry, seed_people_and_rooms};
    use crate::notify::AdminEvent;
    use crate::operations::plan::NewClassGroup;
    use crate::{Reservation, TimeRange};

    #[derive(Default)]
    struct Recording(RefCell<Vec<AdminEvent>>);

    impl Notifier for Recording {
        fn notify_admins(&self, n: &AdminNotification) -> Result<()> {
            self.0.borrow_mut().push(n.event);
            Ok(())
        }
    }

    struct Failing;

    impl Notifier for Failing {
        fn notify_admins(&self, _: &AdminNotification) -> Result<()> {
            Err(Error::Io(std::io::Error::other("mail relay down")))
        }
    }

    fn booking(seed: &crate::database::test_util::Seed, s: &str, e: &str) -> Reservation {
        Reservation::builder(
            seed.student,
            seed.room,
            date("2025-03-10"),
            TimeRange::parse(s, e).unwrap(),
        )
        .build()
        .unwrap()
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let mut db = create_test_database();
        let seed = seed_people_and_rooms(db.connection());
        let r = booking(&seed, "09:00", "10:00");
        let plan = OperationPlan::new("Book").add_action(PlanAction::CreateReservation(r.clone()));

        let result = PlanExecutor::new(&mut db).dry_run().execute(&plan).unwrap();
        assert!(result.dry_run);
        assert_eq!(result.reservation.as_ref(), Some(r.id()));
        assert_eq!(result.actions_taken.len(), 1);
        assert!(Database::get_reservation(db.connection(), r.id())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_stale_plan_is_rejected_inside_transaction() {
        let mut db = create_test_database();
        let seed = seed_people_and_rooms(db.connection());

        // Two plans built against the same empty room
        let first = OperationPlan::new("First")
            .add_action(PlanAction::CreateReservation(booking(&seed, "09:00", "10:00")));
        let second = OperationPlan::new("Second")
            .add_action(PlanAction::CreateReservation(booking(&seed, "09:30", "10:30")));

        PlanExecutor::new(&mut db).execute(&first).unwrap();
        let err = PlanExecutor::new(&mut db).execute(&second).unwrap_err();
        assert!(err.is_slot_unavailable());
        assert_eq!(Database::list_reservations(db.connection()).unwrap().len(), 1);
    }

    #[test]
    fn test_notifications_delivered_after_commit() {
        let mut db = create_test_database();
        let seed = seed_people_and_rooms(db.connection());
        let r = booking(&seed, "09:00", "10:00");
        let plan = OperationPlan::new("Book")
            .add_action(PlanAction::CreateReservation(r.clone()))
            .add_action(PlanAction::NotifyAdmins(AdminNotification::new(
                AdminEvent::ReservationCreated,
                &r,
                true,
            )));

        let recording = Recording::default();
        let result = PlanExecutor::new(&mut db)
            .with_notifier(&recording)
            .execute(&plan)
            .unwrap();
        assert_eq!(result.notifications_delivered, 1);
        assert_eq!(*recording.0.borrow(), [AdminEvent::ReservationCreated]);
    }

    #[test]
    fn test_failing_notifier_does_not_fail_operation() {
        let mut db = create_test_database();
        let seed = seed_people_and_rooms(db.connection());
        let r = booking(&seed, "09:00", "10:00");
        let plan = OperationPlan::new("Book")
            .add_action(PlanAction::CreateReservation(r.clone()))
            .add_action(PlanAction::NotifyAdmins(AdminNotification::new(
                AdminEvent::ReservationCreated,
                &r,
                false,
            )));

        let result = PlanExecutor::new(&mut db)
            .with_notifier(&Failing)
            .execute(&plan)
            .unwrap();
        assert!(result.success);
        assert_eq!(result.notifications_delivered, 0);
        assert!(Database::get_reservation(db.connection(), r.id())
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_failed_action_rolls_back_earlier_actions() {
        let mut db = create_test_database();
        let seed = seed_people_and_rooms(db.connection());
        let plan = OperationPlan::new("Create then fail")
            .add_action(PlanAction::CreateClassGroup(NewClassGroup {
                details: ClassGroupDetails::new("Intro", "CS101"),
                professor: Some(seed.professor),
                students: vec![],
                entries: vec![entry("Monday", "09:00", "10:00", "Lecture")],
            }))
            .add_action(PlanAction::DeleteClassGroup(ClassGroupId(999)));

        assert!(PlanExecutor::new(&mut db).execute(&plan).unwrap_err().is_not_found());
        assert!(Database::list_class_groups(db.connection()).unwrap().is_empty());
        assert!(Database::personal_entries(db.connection(), seed.professor)
            .unwrap()
            .is_empty());
    }
}
