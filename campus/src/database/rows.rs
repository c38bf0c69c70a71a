//! Column encoding shared by the query modules.

use std::time::{Duration, SystemTime};

use chrono::NaiveDate;

use crate::error::Result;
use crate::interval::{TimeInterval, TimeOfDay, TimeRange, Weekday};

/// Converts a `SystemTime` to Unix epoch seconds for storage.
///
/// # Errors
///
/// Returns a validation error for times before the epoch.
#[allow(clippy::cast_possible_wrap)]
pub(super) fn systemtime_to_unix_secs(time: SystemTime) -> Result<i64> {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| crate::error::Error::Validation {
            field: "timestamp".into(),
            message: format!("Invalid timestamp: {e}"),
        })
        .map(|d| d.as_secs() as i64)
}

/// Converts Unix epoch seconds from the database to a `SystemTime`.
#[allow(clippy::cast_sign_loss)]
pub(super) fn unix_secs_to_systemtime(secs: i64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs.max(0) as u64)
}

/// Wraps a decoding failure for column `idx`.
pub(super) fn decode_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

/// Parses a `FromStr` column.
pub(super) fn parse_column<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(idx)?;
    text.parse::<T>().map_err(|e| decode_error(idx, e))
}

/// Stored date text.
pub(super) fn date_to_sql(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Reads a `yyyy-MM-dd` column.
pub(super) fn date_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    crate::interval::parse_date(&text).map_err(|e| decode_error(idx, e))
}

/// Reads a `start_minute, end_minute` column pair.
pub(super) fn range_columns(
    row: &rusqlite::Row<'_>,
    start_idx: usize,
    end_idx: usize,
) -> rusqlite::Result<TimeRange> {
    let start = minute_column(row, start_idx)?;
    let end = minute_column(row, end_idx)?;
    TimeRange::new(start, end).map_err(|e| decode_error(end_idx, e))
}

/// Reads a `day, start_minute, end_minute` column triple.
pub(super) fn interval_columns(
    row: &rusqlite::Row<'_>,
    day_idx: usize,
) -> rusqlite::Result<TimeInterval> {
    let day: Weekday = parse_column(row, day_idx)?;
    let range = range_columns(row, day_idx + 1, day_idx + 2)?;
    Ok(TimeInterval::new(day, range))
}

fn minute_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<TimeOfDay> {
    let minutes: u16 = row.get(idx)?;
    TimeOfDay::from_minutes(minutes).ok_or(rusqlite::Error::IntegralValueOutOfRange(
        idx,
        i64::from(minutes),
    ))
}
