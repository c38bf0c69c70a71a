//! Reservation request planning.

use chrono::NaiveDateTime;

use crate::classroom::ClassroomId;
use crate::database::Database;
use crate::error::Result;
use crate::interval::{parse_date, TimeRange};
use crate::notify::{AdminEvent, AdminNotification};
use crate::person::PersonId;
use crate::reservation::{Reservation, ReservationStatus};
use crate::settings::Settings;

use super::checks::ensure_room_free;
use super::plan::{OperationPlan, PlanAction, RoomCheck};
use super::policy::{check_timing, check_weekly_quota};

/// Options for requesting a classroom.
///
/// Date and times stay as text until planning so malformed input surfaces
/// as [`crate::Error::InvalidFormat`] from the plan.
#[derive(Debug, Clone)]
pub struct ReserveOptions {
    /// Who is asking.
    pub requester: PersonId,
    /// Which room.
    pub classroom: ClassroomId,
    /// `yyyy-MM-dd`.
    pub date: String,
    /// `HH:MM`.
    pub start: String,
    /// `HH:MM`.
    pub end: String,
    /// Why.
    pub purpose: Option<String>,
    /// Free text.
    pub notes: Option<String>,
    /// Reference time for policy checks.
    pub now: NaiveDateTime,
}

impl ReserveOptions {
    /// Creates options with no purpose or notes, evaluated at local now.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus::operations::ReserveOptions;
    /// use campus::{ClassroomId, PersonId};
    ///
    /// let options = ReserveOptions::new(PersonId(3), ClassroomId(1), "2025-03-10", "14:00", "15:00")
    ///     .with_purpose(Some("Study group".into()));
    /// assert_eq!(options.purpose.as_deref(), Some("Study group"));
    /// ```
    #[must_use]
    pub fn new(
        requester: PersonId,
        classroom: ClassroomId,
        date: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            requester,
            classroom,
            date: date.into(),
            start: start.into(),
            end: end.into(),
            purpose: None,
            notes: None,
            now: chrono::Local::now().naive_local(),
        }
    }

    /// Sets the purpose.
    #[must_use]
    pub fn with_purpose(mut self, purpose: Option<String>) -> Self {
        self.purpose = purpose;
        self
    }

    /// Sets the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Evaluates policy as of `now`.
    #[must_use]
    pub const fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }
}

/// Trims free text; blank becomes `None`.
pub(super) fn clean_text(text: Option<&String>) -> Option<String> {
    text.map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Plans a reservation request.
pub struct ReservePlan<'a> {
    options: ReserveOptions,
    settings: &'a Settings,
}

impl<'a> ReservePlan<'a> {
    /// Creates a plan evaluated against `settings`.
    #[must_use]
    pub const fn new(options: ReserveOptions, settings: &'a Settings) -> Self {
        Self { options, settings }
    }

    /// Builds the plan.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] for an unknown requester or
    /// classroom, [`crate::Error::InvalidFormat`] or
    /// [`crate::Error::InvalidTimeRange`] for bad input,
    /// [`crate::Error::Validation`] for a policy violation, or
    /// [`crate::Error::SlotUnavailable`] when the room is taken.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let conn = db.connection();
        let opts = &self.options;

        // Step 1: Resolve requester and room
        let requester = Database::require_person(conn, opts.requester)?;
        let classroom = Database::require_classroom(conn, opts.classroom)?;

        // Step 2: Parse the slot
        let date = parse_date(&opts.date)?;
        let range = TimeRange::parse(&opts.start, &opts.end)?;

        // Step 3: Policy limits
        check_timing(self.settings, date, &range, opts.now)?;
        check_weekly_quota(conn, self.settings, requester.id, date)?;

        // Step 4: Room availability
        ensure_room_free(conn, classroom.id, date, &range, None, RoomCheck::Active)?;

        // Step 5: Initial status
        let status = if self.settings.requires_approval(requester.role) {
            ReservationStatus::Pending
        } else {
            ReservationStatus::Approved
        };

        let reservation = Reservation::builder(requester.id, classroom.id, date, range)
            .purpose(clean_text(opts.purpose.as_ref()))
            .notes(clean_text(opts.notes.as_ref()))
            .status(status)
            .build()?;

        let mut plan = OperationPlan::new(format!(
            "Reserve classroom {} for {}",
            classroom.room_number,
            requester.full_name()
        ));
        if status == ReservationStatus::Pending {
            let notification = AdminNotification::new(
                AdminEvent::ReservationCreated,
                &reservation,
                self.settings.emails_on_create(),
            );
            plan = plan
                .add_action(PlanAction::CreateReservation(reservation))
                .add_action(PlanAction::NotifyAdmins(notification));
        } else {
            plan = plan.add_action(PlanAction::CreateReservation(reservation));
        }
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, seed_people_and_rooms};
    use crate::Error;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2025-03-07 12:00", "%Y-%m-%d %H:%M").unwrap()
    }

    fn created(plan: &OperationPlan) -> &Reservation {
        match &plan.actions[0] {
            PlanAction::CreateReservation(r) => r,
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_student_request_is_pending_and_notifies() {
        let db = create_test_database();
        let seed = seed_people_and_rooms(db.connection());
        let settings = Settings::default();

        let options = ReserveOptions::new(seed.student, seed.room, "2025-03-10", "14:00", "15:00")
            .with_purpose(Some("  Study group ".into()))
            .with_notes(Some("   ".into()))
            .with_now(now());
        let plan = ReservePlan::new(options, &settings).build_plan(&db).unwrap();

        let r = created(&plan);
        assert_eq!(r.status(), ReservationStatus::Pending);
        assert_eq!(r.purpose(), Some("Study group"));
        assert_eq!(r.notes(), None);
        assert!(matches!(
            &plan.actions[1],
            PlanAction::NotifyAdmins(n) if n.event == AdminEvent::ReservationCreated && n.email
        ));
    }

    #[test]
    fn test_professor_and_admin_are_auto_approved() {
        let db = create_test_database();
        let seed = seed_people_and_rooms(db.connection());
        let settings = Settings::default();

        for who in [seed.professor, seed.admin] {
            let options = ReserveOptions::new(who, seed.room, "2025-03-10", "14:00", "15:00")
                .with_now(now());
            let plan = ReservePlan::new(options, &settings).build_plan(&db).unwrap();
            assert_eq!(plan.len(), 1);
            assert_eq!(created(&plan).status(), ReservationStatus::Approved);
        }

        let strict = Settings {
            professor_require_approval: true,
            ..Settings::default()
        };
        let options = ReserveOptions::new(seed.professor, seed.room, "2025-03-10", "14:00", "15:00")
            .with_now(now());
        let plan = ReservePlan::new(options, &strict).build_plan(&db).unwrap();
        assert_eq!(created(&plan).status(), ReservationStatus::Pending);
    }

    #[test]
    fn test_bad_input_is_rejected() {
        let db = create_test_database();
        let seed = seed_people_and_rooms(db.connection());
        let settings = Settings::default();
        let plan = |date: &str, start: &str, end: &str| {
            let options = ReserveOptions::new(seed.student, seed.room, date, start, end)
                .with_now(now());
            ReservePlan::new(options, &settings).build_plan(&db)
        };

        assert!(matches!(
            plan("10/03/2025", "14:00", "15:00"),
            Err(Error::InvalidFormat { kind: "date", .. })
        ));
        assert!(matches!(
            plan("2025-03-10", "24:00", "15:00"),
            Err(Error::InvalidFormat { kind: "time", .. })
        ));
        assert!(matches!(
            plan("2025-03-10", "15:00", "14:00"),
            Err(Error::InvalidTimeRange { .. })
        ));

        let unknown = ReserveOptions::new(PersonId(404), seed.room, "2025-03-10", "14:00", "15:00")
            .with_now(now());
        assert!(ReservePlan::new(unknown, &settings)
            .build_plan(&db)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_weekly_quota() {
        let mut db = create_test_database();
        let seed = seed_people_and_rooms(db.connection());
        let settings = Settings {
            max_reservations_per_week: 1,
            ..Settings::default()
        };

        let first = ReserveOptions::new(seed.student, seed.room, "2025-03-10", "09:00", "10:00")
            .with_now(now());
        let plan = ReservePlan::new(first, &settings).build_plan(&db).unwrap();
        super::super::PlanExecutor::new(&mut db).execute(&plan).unwrap();

        let second = ReserveOptions::new(seed.student, seed.room, "2025-03-14", "09:00", "10:00")
            .with_now(now());
        let err = ReservePlan::new(second, &settings).build_plan(&db).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));

        let next_week = ReserveOptions::new(seed.student, seed.room, "2025-03-17", "09:00", "10:00")
            .with_now(now());
        ReservePlan::new(next_week, &settings).build_plan(&db).unwrap();
    }
}
