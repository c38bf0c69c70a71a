//! Human-facing output for conflict checks.
//!
//! [`format_conflicts`] renders a [`crate::conflict::ConflictReport`] as a
//! multi-line message, [`summary_message`] gives a one-line verdict for
//! interactive checks, and [`suggest_alternatives`] proposes nearby slots
//! the caller may try instead.

mod formatter;
mod suggest;

pub use formatter::{format_conflicts, summary_message, STUDENT_LISTING_LIMIT};
pub use suggest::{suggest_alternatives, Alternative, AlternativeKind};
