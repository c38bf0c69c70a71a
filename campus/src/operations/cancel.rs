//! Canceling a reservation.

use chrono::NaiveDate;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::notify::{AdminEvent, AdminNotification};
use crate::person::PersonId;
use crate::reservation::{ReservationId, ReservationStatus};
use crate::settings::Settings;

use super::plan::{OperationPlan, PlanAction, RoomCheck};

/// Options for canceling a reservation.
#[derive(Debug, Clone)]
pub struct CancelOptions {
    /// Who is canceling; must own the reservation.
    pub actor: PersonId,
    /// The reservation.
    pub reservation: ReservationId,
    /// Reservations dated before this day can no longer be canceled.
    pub today: NaiveDate,
}

impl CancelOptions {
    /// Creates cancel options evaluated against the local date.
    #[must_use]
    pub fn new(actor: PersonId, reservation: ReservationId) -> Self {
        Self {
            actor,
            reservation,
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Evaluates the date rule against `today`.
    #[must_use]
    pub const fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

/// Plans a cancellation.
pub struct CancelPlan<'a> {
    options: CancelOptions,
    settings: &'a Settings,
}

impl<'a> CancelPlan<'a> {
    /// Creates a plan evaluated against `settings`.
    #[must_use]
    pub const fn new(options: CancelOptions, settings: &'a Settings) -> Self {
        Self { options, settings }
    }

    /// Builds the plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::Unauthorized`] for anyone but
    /// the owner, or [`Error::InvalidTransition`] if the date has passed or
    /// the reservation is already closed.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let opts = &self.options;
        let mut reservation = Database::require_reservation(db.connection(), &opts.reservation)?;

        if reservation.owner() != opts.actor {
            return Err(Error::Unauthorized {
                actor: opts.actor.0,
                action: format!("cancel reservation {}", reservation.id()),
            });
        }
        if reservation.date() < opts.today {
            return Err(Error::InvalidTransition {
                reservation: reservation.id().to_string(),
                reason: format!(
                    "its date {} has already passed",
                    reservation.date().format("%Y-%m-%d")
                ),
            });
        }
        let expected = reservation.status();
        reservation.transition(ReservationStatus::Canceled)?;

        let notification = AdminNotification::new(
            AdminEvent::ReservationCanceled,
            &reservation,
            self.settings.email_notifications,
        );
        Ok(OperationPlan::new(format!("Cancel reservation {}", reservation.id()))
            .add_action(PlanAction::UpdateReservation {
                reservation,
                expected,
                check: RoomCheck::Skip,
            })
            .add_action(PlanAction::NotifyAdmins(notification)))
    }
}
