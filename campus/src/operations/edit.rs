//! Editing a pending reservation.

use chrono::NaiveDateTime;

use crate::classroom::ClassroomId;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::interval::{parse_date, TimeRange};
use crate::notify::{AdminEvent, AdminNotification};
use crate::person::PersonId;
use crate::reservation::{ReservationId, ReservationStatus, Reschedule};
use crate::settings::Settings;

use super::checks::ensure_room_free;
use super::plan::{OperationPlan, PlanAction, RoomCheck};
use super::policy::check_timing;
use super::reserve::clean_text;

/// Options for editing a reservation.
#[derive(Debug, Clone)]
pub struct EditOptions {
    /// Who is editing; must own the reservation.
    pub actor: PersonId,
    /// The reservation.
    pub reservation: ReservationId,
    /// New room.
    pub classroom: ClassroomId,
    /// New date, `yyyy-MM-dd`.
    pub date: String,
    /// New start, `HH:MM`.
    pub start: String,
    /// New end, `HH:MM`.
    pub end: String,
    /// New purpose; `None` clears it.
    pub purpose: Option<String>,
    /// New notes; `None` keeps the stored notes.
    pub notes: Option<String>,
    /// Reference time for policy checks.
    pub now: NaiveDateTime,
}

impl EditOptions {
    /// Creates edit options evaluated at local now.
    #[must_use]
    pub fn new(
        actor: PersonId,
        reservation: ReservationId,
        classroom: ClassroomId,
        date: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            actor,
            reservation,
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

/// Plans an edit.
pub struct EditPlan<'a> {
    options: EditOptions,
    settings: &'a Settings,
}

impl<'a> EditPlan<'a> {
    /// Creates a plan evaluated against `settings`.
    #[must_use]
    pub const fn new(options: EditOptions, settings: &'a Settings) -> Self {
        Self { options, settings }
    }

    /// Builds the plan.
    ///
    /// The room is re-checked only when the classroom, date or times
    /// change, and never against the reservation itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::Unauthorized`] for anyone but
    /// the owner, [`Error::InvalidTransition`] unless PENDING, a parse or
    /// policy error, or [`Error::SlotUnavailable`].
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let conn = db.connection();
        let opts = &self.options;

        // Step 1: Load and authorize
        let existing = Database::require_reservation(conn, &opts.reservation)?;
        if existing.owner() != opts.actor {
            return Err(Error::Unauthorized {
                actor: opts.actor.0,
                action: format!("edit reservation {}", existing.id()),
            });
        }
        if existing.status() != ReservationStatus::Pending {
            return Err(Error::InvalidTransition {
                reservation: existing.id().to_string(),
                reason: format!(
                    "only PENDING reservations can be edited, this one is {}",
                    existing.status()
                ),
            });
        }

        // Step 2: Resolve the new slot
        let classroom = Database::require_classroom(conn, opts.classroom)?;
        let date = parse_date(&opts.date)?;
        let range = TimeRange::parse(&opts.start, &opts.end)?;
        let moved = classroom.id != existing.classroom()
            || date != existing.date()
            || range != existing.range();

        // Step 3: Re-validate only if the slot moved
        if moved {
            check_timing(self.settings, date, &range, opts.now)?;
            ensure_room_free(
                conn,
                classroom.id,
                date,
                &range,
                Some(existing.id()),
                RoomCheck::Active,
            )?;
        }

        let mut updated = existing;
        updated.reschedule(Reschedule {
            classroom: classroom.id,
            date,
            range,
            purpose: clean_text(opts.purpose.as_ref()),
            notes: clean_text(opts.notes.as_ref()),
        });

        let notification = AdminNotification::new(
            AdminEvent::ReservationUpdated,
            &updated,
            self.settings.email_notifications,
        );
        Ok(OperationPlan::new(format!("Edit reservation {}", updated.id()))
            .add_action(PlanAction::UpdateReservation {
                reservation: updated,
                expected: ReservationStatus::Pending,
                check: if moved { RoomCheck::Active } else { RoomCheck::Skip },
            })
            .add_action(PlanAction::NotifyAdmins(notification)))
    }
}
