//! Wall-clock time, weekday and interval types.
//!
//! All scheduling comparisons in the crate reduce to the half-open overlap
//! test implemented here: two ranges collide iff `a.start < b.end` and
//! `b.start < a.end`. Ranges that merely touch (`a.end == b.start`) do not
//! collide.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const TIME_FORMAT: &str = "HH:MM (24-hour, hours 0-23, minutes 00-59)";
const DATE_FORMAT: &str = "yyyy-MM-dd";

/// A teaching day. The institution schedules Monday through Friday only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
}

impl Weekday {
    /// All teaching days in calendar order.
    pub const ALL: [Self; 5] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
    ];

    /// Returns the canonical English name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
        }
    }

    /// Returns the following teaching day, wrapping Friday to Monday.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus::Weekday;
    ///
    /// assert_eq!(Weekday::Tuesday.next(), Weekday::Wednesday);
    /// assert_eq!(Weekday::Friday.next(), Weekday::Monday);
    /// ```
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Monday => Self::Tuesday,
            Self::Tuesday => Self::Wednesday,
            Self::Wednesday => Self::Thursday,
            Self::Thursday => Self::Friday,
            Self::Friday => Self::Monday,
        }
    }

    /// Maps a calendar weekday onto a teaching day (`None` on weekends).
    #[must_use]
    pub const fn from_chrono(day: chrono::Weekday) -> Option<Self> {
        match day {
            chrono::Weekday::Mon => Some(Self::Monday),
            chrono::Weekday::Tue => Some(Self::Tuesday),
            chrono::Weekday::Wed => Some(Self::Wednesday),
            chrono::Weekday::Thu => Some(Self::Thursday),
            chrono::Weekday::Fri => Some(Self::Friday),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|day| day.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidFormat {
                kind: "weekday",
                value: s.to_string(),
                expected: "Monday, Tuesday, Wednesday, Thursday or Friday",
            })
    }
}

/// A wall-clock time stored as minutes since midnight (0-1439).
///
/// # Examples
///
/// ```
/// use campus::TimeOfDay;
///
/// let t: TimeOfDay = "9:05".parse().unwrap();
/// assert_eq!(t.minutes(), 545);
/// assert_eq!(t.to_string(), "09:05");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// The last representable minute of the day (23:59).
    pub const LAST_MINUTE: u16 = 23 * 60 + 59;

    /// Builds a time from minutes since midnight.
    #[must_use]
    pub const fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes <= Self::LAST_MINUTE {
            Some(Self(minutes))
        } else {
            None
        }
    }

    /// Minutes since midnight.
    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.0
    }

    /// Hour component (0-23).
    #[must_use]
    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    /// Minute component (0-59).
    #[must_use]
    pub const fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Adds minutes, returning `None` past 23:59.
    #[must_use]
    pub fn checked_add(self, minutes: u16) -> Option<Self> {
        self.0.checked_add(minutes).and_then(Self::from_minutes)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_time(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        parse_time(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Parses an `H:MM` / `HH:MM` wall-clock string.
///
/// Hours may be written with one or two digits (0-23); minutes always use
/// two digits (00-59).
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] for anything else, including
/// surrounding whitespace.
///
/// # Examples
///
/// ```
/// use campus::interval::parse_time;
///
/// assert_eq!(parse_time("14:30").unwrap().minutes(), 870);
/// assert!(parse_time("25:00").is_err());
/// assert!(parse_time("9:5").is_err());
/// ```
pub fn parse_time(text: &str) -> Result<TimeOfDay> {
    let invalid = || Error::InvalidFormat {
        kind: "time",
        value: text.to_string(),
        expected: TIME_FORMAT,
    };

    let (hours, minutes) = text.split_once(':').ok_or_else(invalid)?;
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    if hours.is_empty() || hours.len() > 2 || !all_digits(hours) {
        return Err(invalid());
    }
    if minutes.len() != 2 || !all_digits(minutes) {
        return Err(invalid());
    }

    let hours: u16 = hours.parse().map_err(|_| invalid())?;
    let minutes: u16 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(TimeOfDay(hours * 60 + minutes))
}

/// Parses a `yyyy-MM-dd` calendar date.
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] if the text is not a valid date in that
/// exact layout.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let invalid = || Error::InvalidFormat {
        kind: "date",
        value: text.to_string(),
        expected: DATE_FORMAT,
    };
    if text.len() != DATE_FORMAT.len() {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| invalid())
}

/// A half-open `[start, end)` range of wall-clock time without a day.
///
/// Dated reservations use this directly; recurring timetable slots wrap it
/// in a [`TimeInterval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct TimeRange {
    start: TimeOfDay,
    end: TimeOfDay,
}

#[derive(Deserialize)]
struct RawRange {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TryFrom<RawRange> for TimeRange {
    type Error = Error;

    fn try_from(raw: RawRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeRange {
    /// Creates a range, rejecting empty or inverted ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeRange`] if `end <= start`.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self> {
        if end <= start {
            return Err(Error::InvalidTimeRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses both bounds and validates the range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] for a malformed bound and
    /// [`Error::InvalidTimeRange`] if `end <= start`.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_time(start)?, parse_time(end)?)
    }

    /// Inclusive start.
    #[must_use]
    pub const fn start(&self) -> TimeOfDay {
        self.start
    }

    /// Exclusive end.
    #[must_use]
    pub const fn end(&self) -> TimeOfDay {
        self.end
    }

    /// Length in minutes.
    #[must_use]
    pub const fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }

    /// Half-open overlap test.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Moves the range later by `offset` minutes, keeping its length.
    ///
    /// Returns `None` when the shifted range would run past 23:59.
    #[must_use]
    pub fn shifted(&self, offset: u16) -> Option<Self> {
        let start = self.start.checked_add(offset)?;
        let end = self.end.checked_add(offset)?;
        Some(Self { start, end })
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// A recurring weekly slot: a teaching day plus a time range.
///
/// # Examples
///
/// ```
/// use campus::{TimeInterval, Weekday};
///
/// let a = TimeInterval::parse("Monday", "09:00", "10:00").unwrap();
/// let b = TimeInterval::parse("Monday", "10:00", "11:00").unwrap();
/// assert!(!a.overlaps(&b));
/// assert_eq!(a.label(), "Monday (09:00 - 10:00)");
/// assert_eq!(a.day(), Weekday::Monday);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    day: Weekday,
    #[serde(flatten)]
    range: TimeRange,
}

impl TimeInterval {
    /// Creates an interval on a day.
    #[must_use]
    pub const fn new(day: Weekday, range: TimeRange) -> Self {
        Self { day, range }
    }

    /// Parses day name and both bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] for a malformed day or time and
    /// [`Error::InvalidTimeRange`] if `end <= start`.
    pub fn parse(day: &str, start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(day.parse()?, TimeRange::parse(start, end)?))
    }

    /// The teaching day.
    #[must_use]
    pub const fn day(&self) -> Weekday {
        self.day
    }

    /// The time range within the day.
    #[must_use]
    pub const fn range(&self) -> TimeRange {
        self.range
    }

    /// Inclusive start.
    #[must_use]
    pub const fn start(&self) -> TimeOfDay {
        self.range.start
    }

    /// Exclusive end.
    #[must_use]
    pub const fn end(&self) -> TimeOfDay {
        self.range.end
    }

    /// Same-day half-open overlap test.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && self.range.overlaps(&other.range)
    }

    /// Canonical conflict-window label, e.g. `Monday (09:00 - 10:00)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.day, self.range)
    }

    /// The same time range on a different day.
    #[must_use]
    pub const fn on_day(&self, day: Weekday) -> Self {
        Self::new(day, self.range)
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Free-function form of [`TimeInterval::overlaps`].
#[must_use]
pub fn overlaps(a: &TimeInterval, b: &TimeInterval) -> bool {
    a.overlaps(b)
}

#[cfg(all(test, feature = "property-tests"))]
mod proptests;
