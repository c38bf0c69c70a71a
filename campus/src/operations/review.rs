//! Administrator review of pending reservations.

use std::fmt;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::person::{PersonId, Role};
use crate::reservation::{ReservationId, ReservationStatus};

use super::checks::ensure_room_free;
use super::plan::{OperationPlan, PlanAction, RoomCheck};

/// Outcome of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// PENDING to APPROVED.
    Approve,
    /// PENDING to REJECTED.
    Reject,
}

impl Decision {
    const fn target(self) -> ReservationStatus {
        match self {
            Self::Approve => ReservationStatus::Approved,
            Self::Reject => ReservationStatus::Rejected,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        })
    }
}

/// Options for reviewing a reservation.
#[derive(Debug, Clone)]
pub struct ReviewOptions {
    /// Reviewer; must be an administrator.
    pub actor: PersonId,
    /// The reservation.
    pub reservation: ReservationId,
    /// Approve or reject.
    pub decision: Decision,
}

impl ReviewOptions {
    /// Approve `reservation`.
    #[must_use]
    pub const fn approve(actor: PersonId, reservation: ReservationId) -> Self {
        Self {
            actor,
            reservation,
            decision: Decision::Approve,
        }
    }

    /// Reject `reservation`.
    #[must_use]
    pub const fn reject(actor: PersonId, reservation: ReservationId) -> Self {
        Self {
            actor,
            reservation,
            decision: Decision::Reject,
        }
    }
}

/// Plans an approval or rejection.
pub struct ReviewPlan {
    options: ReviewOptions,
}

impl ReviewPlan {
    /// Creates a review plan.
    #[must_use]
    pub const fn new(options: ReviewOptions) -> Self {
        Self { options }
    }

    /// Builds the plan.
    ///
    /// Approval is checked against other APPROVED reservations only, so
    /// one of several overlapping requests can still be picked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::Unauthorized`] for anyone but
    /// an administrator, [`Error::InvalidTransition`] unless PENDING, or
    /// [`Error::SlotUnavailable`] when approving into a taken slot.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let conn = db.connection();
        let opts = &self.options;

        let actor = Database::require_person(conn, opts.actor)?;
        if actor.role != Role::Admin {
            return Err(Error::Unauthorized {
                actor: opts.actor.0,
                action: format!("{} reservation {}", opts.decision, opts.reservation),
            });
        }

        let mut reservation = Database::require_reservation(conn, &opts.reservation)?;
        let expected = reservation.status();
        reservation.transition(opts.decision.target())?;

        let check = match opts.decision {
            Decision::Approve => RoomCheck::Approved,
            Decision::Reject => RoomCheck::Skip,
        };
        ensure_room_free(
            conn,
            reservation.classroom(),
            reservation.date(),
            &reservation.range(),
            Some(reservation.id()),
            check,
        )?;

        let description = match opts.decision {
            Decision::Approve => format!("Approve reservation {}", reservation.id()),
            Decision::Reject => format!("Reject reservation {}", reservation.id()),
        };
        Ok(OperationPlan::new(description)
            .add_action(PlanAction::UpdateReservation {
                reservation,
                expected,
                check,
            }))
    }
}
