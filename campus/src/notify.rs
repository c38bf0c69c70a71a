//! Administrative notifications raised by the reservation lifecycle.
//!
//! Delivery is fire-and-forget: [`deliver`] logs a failing [`Notifier`]
//! and carries on. The schedule change that triggered the notification
//! has already committed by then.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classroom::ClassroomId;
use crate::database::{Database, DatabaseConfig};
use crate::error::Result;
use crate::interval::TimeRange;
use crate::person::PersonId;
use crate::reservation::{Reservation, ReservationId, ReservationStatus};

/// Why administrators are being told about a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminEvent {
    /// A request was created and awaits review.
    ReservationCreated,
    /// A pending request was edited.
    ReservationUpdated,
    /// A request was canceled by its owner.
    ReservationCanceled,
}

impl AdminEvent {
    /// Storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReservationCreated => "RESERVATION_CREATED",
            Self::ReservationUpdated => "RESERVATION_UPDATED",
            Self::ReservationCanceled => "RESERVATION_CANCELED",
        }
    }
}

impl fmt::Display for AdminEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification addressed to every administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminNotification {
    /// What happened.
    pub event: AdminEvent,
    /// The reservation concerned.
    pub reservation: ReservationId,
    /// Its owner.
    pub owner: PersonId,
    /// Its classroom.
    pub classroom: ClassroomId,
    /// Its date.
    pub date: NaiveDate,
    /// Its time range.
    #[serde(flatten)]
    pub range: TimeRange,
    /// Status after the change.
    pub status: ReservationStatus,
    /// Whether an email copy should also go out.
    pub email: bool,
}

impl AdminNotification {
    /// Snapshot of `reservation` for `event`.
    #[must_use]
    pub fn new(event: AdminEvent, reservation: &Reservation, email: bool) -> Self {
        Self {
            event,
            reservation: reservation.id().clone(),
            owner: reservation.owner(),
            classroom: reservation.classroom(),
            date: reservation.date(),
            range: reservation.range(),
            status: reservation.status(),
            email,
        }
    }

    /// One-line human summary.
    #[must_use]
    pub fn message(&self) -> String {
        let verb = match self.event {
            AdminEvent::ReservationCreated => "requested",
            AdminEvent::ReservationUpdated => "updated a request for",
            AdminEvent::ReservationCanceled => "canceled",
        };
        format!(
            "Person {} {verb} classroom {} on {} ({})",
            self.owner,
            self.classroom,
            self.date.format("%Y-%m-%d"),
            self.range
        )
    }
}

/// Collaborator that delivers notifications to administrators.
pub trait Notifier {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Implementations report delivery failures; callers go through
    /// [`deliver`], which only logs them.
    fn notify_admins(&self, notification: &AdminNotification) -> Result<()>;
}

/// Writes notifications to the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_admins(&self, notification: &AdminNotification) -> Result<()> {
        log::info!("[{}] {}", notification.event, notification.message());
        Ok(())
    }
}

/// Stores notifications in the `notifications` table for admins to read.
///
/// Opens its own short-lived connection so delivery never shares the
/// transaction that made the change.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    config: DatabaseConfig,
}

impl OutboxNotifier {
    /// Creates an outbox writing to the database described by `config`.
    #[must_use]
    pub const fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

impl Notifier for OutboxNotifier {
    fn notify_admins(&self, notification: &AdminNotification) -> Result<()> {
        let db = Database::open(self.config.clone())?;
        Database::insert_notification(db.connection(), notification)?;
        log::debug!(
            "queued {} notification for reservation {}",
            notification.event,
            notification.reservation
        );
        Ok(())
    }
}

/// Delivers through `notifier`, logging instead of failing.
///
/// Returns whether delivery succeeded.
pub fn deliver(notifier: &dyn Notifier, notification: &AdminNotification) -> bool {
    match notifier.notify_admins(notification) {
        Ok(()) => true,
        Err(e) => {
            log::warn!(
                "failed to notify admins about reservation {}: {e}",
                notification.reservation
            );
            false
        }
    }
}
