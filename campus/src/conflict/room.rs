//! Room-centric conflict detection for dated reservations.

use chrono::NaiveDate;

use crate::classroom::ClassroomId;
use crate::error::Result;
use crate::interval::{TimeOfDay, TimeRange};
use crate::reservation::{Reservation, ReservationId};

/// Active reservations of `classroom` on `date` that overlap `[start, end)`.
///
/// `exclude` skips one reservation by id, so an edit is never compared
/// against its own stored row.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidTimeRange`] if `end <= start`, before any
/// comparison is made.
pub fn conflicting_reservations<'r>(
    existing: impl IntoIterator<Item = &'r Reservation>,
    classroom: ClassroomId,
    date: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
    exclude: Option<&ReservationId>,
) -> Result<Vec<&'r Reservation>> {
    let range = TimeRange::new(start, end)?;
    Ok(existing
        .into_iter()
        .filter(|r| exclude != Some(r.id()))
        .filter(|r| r.occupies(classroom, date, &range))
        .collect())
}

/// Whether any active reservation blocks the requested room slot.
///
/// Only PENDING and APPROVED reservations for the same classroom and date
/// are considered.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidTimeRange`] if `end <= start`.
///
/// # Examples
///
/// ```
/// use campus::conflict::has_conflicting_reservation;
/// use campus::{ClassroomId, PersonId, Reservation, ReservationStatus, TimeRange};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
/// let booked = Reservation::builder(
///     PersonId(1),
///     ClassroomId(1),
///     date,
///     TimeRange::parse("14:00", "15:00").unwrap(),
/// )
/// .status(ReservationStatus::Approved)
/// .build()
/// .unwrap();
///
/// let t = |s: &str| s.parse().unwrap();
/// let existing = [booked];
/// assert!(!has_conflicting_reservation(&existing, ClassroomId(1), date, t("13:00"), t("14:00"), None).unwrap());
/// assert!(has_conflicting_reservation(&existing, ClassroomId(1), date, t("13:30"), t("14:30"), None).unwrap());
/// ```
pub fn has_conflicting_reservation<'r>(
    existing: impl IntoIterator<Item = &'r Reservation>,
    classroom: ClassroomId,
    date: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
    exclude: Option<&ReservationId>,
) -> Result<bool> {
    let hits = conflicting_reservations(existing, classroom, date, start, end, exclude)?;
    if let Some(first) = hits.first() {
        log::debug!(
            "room {classroom} on {date}: {start} - {end} collides with reservation {} ({})",
            first.id(),
            first.range()
        );
    }
    Ok(!hits.is_empty())
}
