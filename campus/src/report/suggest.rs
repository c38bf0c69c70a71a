//! Alternative-slot suggestions for a rejected weekly slot.

use serde::Serialize;

use crate::interval::TimeInterval;

/// How an alternative was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlternativeKind {
    /// Same day, thirty minutes later.
    ThirtyMinutesLater,
    /// Same day, one hour later.
    OneHourLater,
    /// Same times on the next teaching day.
    NextDay,
}

/// A candidate replacement slot. Not checked for availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alternative {
    /// The proposed slot.
    pub interval: TimeInterval,
    /// How it was derived.
    pub kind: AlternativeKind,
    /// Display label, e.g. `Monday at 09:30`.
    pub label: String,
}

impl Alternative {
    fn new(interval: TimeInterval, kind: AlternativeKind) -> Self {
        Self {
            label: format!("{} at {}", interval.day(), interval.start()),
            interval,
            kind,
        }
    }
}

/// Proposes +30 min, +60 min (same day, same length) and the next
/// teaching day at the same time (Friday wraps to Monday).
///
/// Shifts that would run past 23:59 are left out. The caller must
/// re-submit and re-check whichever alternative it picks.
///
/// # Examples
///
/// ```
/// use campus::report::suggest_alternatives;
/// use campus::TimeInterval;
///
/// let rejected = TimeInterval::parse("Friday", "09:00", "10:00").unwrap();
/// let labels: Vec<_> = suggest_alternatives(&rejected)
///     .into_iter()
///     .map(|a| a.label)
///     .collect();
/// assert_eq!(labels, ["Friday at 09:30", "Friday at 10:00", "Monday at 09:00"]);
/// ```
#[must_use]
pub fn suggest_alternatives(rejected: &TimeInterval) -> Vec<Alternative> {
    let mut alternatives = Vec::with_capacity(3);
    for (offset, kind) in [
        (30, AlternativeKind::ThirtyMinutesLater),
        (60, AlternativeKind::OneHourLater),
    ] {
        if let Some(range) = rejected.range().shifted(offset) {
            alternatives.push(Alternative::new(
                TimeInterval::new(rejected.day(), range),
                kind,
            ));
        }
    }
    alternatives.push(Alternative::new(
        rejected.on_day(rejected.day().next()),
        AlternativeKind::NextDay,
    ));
    alternatives
}
