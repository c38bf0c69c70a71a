//! Reservation policy limits taken from [`Settings`].

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::interval::{TimeOfDay, TimeRange};
use crate::person::PersonId;
use crate::settings::Settings;

fn violation(field: &str, message: String) -> Error {
    Error::Validation {
        field: field.into(),
        message,
    }
}

fn at(date: NaiveDate, time: TimeOfDay) -> NaiveDateTime {
    date.and_hms_opt(u32::from(time.hour()), u32::from(time.minute()), 0)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN))
}

/// Monday and Sunday of the ISO week containing `date`.
#[must_use]
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(6))
}

/// Checks the timing limits of a slot relative to `now`.
///
/// # Errors
///
/// Returns [`Error::Validation`] naming the violated limit.
pub fn check_timing(
    settings: &Settings,
    date: NaiveDate,
    range: &TimeRange,
    now: NaiveDateTime,
) -> Result<()> {
    let today = now.date();
    if date < today {
        return Err(violation(
            "date",
            format!("{} is in the past", date.format("%Y-%m-%d")),
        ));
    }

    let ahead = (date - today).num_days();
    if ahead > i64::from(settings.max_days_in_advance) {
        return Err(violation(
            "date",
            format!(
                "reservations open at most {} days in advance",
                settings.max_days_in_advance
            ),
        ));
    }

    let notice = at(date, range.start()) - now;
    if notice < Duration::hours(i64::from(settings.min_time_before_reservation)) {
        return Err(violation(
            "start",
            format!(
                "reservations must start at least {} hour(s) from now",
                settings.min_time_before_reservation
            ),
        ));
    }

    if u32::from(range.duration_minutes()) > settings.max_hours_per_reservation * 60 {
        return Err(violation(
            "end",
            format!(
                "reservations last at most {} hour(s)",
                settings.max_hours_per_reservation
            ),
        ));
    }
    Ok(())
}

/// Checks the weekly quota for a new reservation by `owner` on `date`.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the quota is used up, or a database
/// error.
pub fn check_weekly_quota(
    conn: &Connection,
    settings: &Settings,
    owner: PersonId,
    date: NaiveDate,
) -> Result<()> {
    let (monday, sunday) = week_bounds(date);
    let held = Database::count_active_for_owner_between(conn, owner, monday, sunday)?;
    if held >= settings.max_reservations_per_week {
        return Err(violation(
            "date",
            format!(
                "person {owner} already holds {held} reservation(s) in the week of {}",
                monday.format("%Y-%m-%d")
            ),
        ));
    }
    Ok(())
}
