//! Conflict report rendering.

use std::fmt::Write;

use crate::conflict::{ConflictReport, Party};

/// Student lists longer than this collapse to a count.
pub const STUDENT_LISTING_LIMIT: usize = 3;

const HEADER: &str = "The following time slots have conflicts:\n";

/// Renders every conflicting window on its own line.
///
/// Professors are listed by name; students are listed by name up to
/// [`STUDENT_LISTING_LIMIT`] and as `"N students"` beyond that. Windows
/// without parties (collisions inside the submitted schedule) render as
/// `"overlaps another submitted entry"`.
///
/// # Examples
///
/// ```
/// use campus::conflict::ConflictReport;
/// use campus::report::format_conflicts;
/// use campus::{Person, PersonId, Role, TimeInterval};
///
/// let mut report = ConflictReport::new();
/// let slot = TimeInterval::parse("Monday", "09:30", "10:30").unwrap();
/// report.record(&slot, &Person {
///     id: PersonId(1),
///     first_name: "Grace".into(),
///     last_name: "Hopper".into(),
///     email: String::new(),
///     role: Role::Professor,
/// });
///
/// assert_eq!(
///     format_conflicts(&report),
///     "The following time slots have conflicts:\n\
///      - Monday (09:30 - 10:30): Professors: Professor Grace Hopper; \n"
/// );
/// ```
#[must_use]
pub fn format_conflicts(report: &ConflictReport) -> String {
    let mut message = String::from(HEADER);

    for window in report.windows() {
        let _ = write!(message, "- {}: ", window.label);

        if !window.professors.is_empty() {
            let names: Vec<String> = window
                .professors
                .iter()
                .map(|p| format!("Professor {}", p.full_name()))
                .collect();
            let _ = write!(message, "Professors: {}; ", names.join(", "));
        }

        if !window.students.is_empty() {
            let _ = write!(message, "Students: {}", student_listing(&window.students));
        }

        if window.professors.is_empty() && window.students.is_empty() {
            message.push_str("overlaps another submitted entry");
        }

        message.push('\n');
    }

    message
}

fn student_listing(students: &[Party]) -> String {
    if students.len() <= STUDENT_LISTING_LIMIT {
        students
            .iter()
            .map(Party::full_name)
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        format!("{} students", students.len())
    }
}

/// One-line verdict for an interactive check.
///
/// # Examples
///
/// ```
/// use campus::conflict::ConflictReport;
/// use campus::report::summary_message;
///
/// assert_eq!(summary_message(&ConflictReport::new()), "No conflicts found.");
/// ```
#[must_use]
pub fn summary_message(report: &ConflictReport) -> String {
    if report.is_empty() {
        return "No conflicts found.".to_string();
    }
    format!(
        "This time slot conflicts with existing schedules for {} professor(s) and {} student(s).",
        report.professor_count(),
        report.student_count()
    )
}
