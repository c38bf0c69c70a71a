#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # campus
//!
//! A library for conflict-free classroom reservations and weekly class
//! timetables.
//!
//! Class groups carry a weekly timetable that is mirrored into the
//! personal timetable of their professor. Before a timetable is stored or a
//! person joins a group, the affected commitments are checked for overlap.
//! Classroom reservations follow a pending/approved/rejected/canceled
//! lifecycle and may never overlap another active booking of the same room.
//!
//! ## Core Types
//!
//! - [`Weekday`], [`TimeOfDay`], [`TimeRange`] and [`TimeInterval`]: time model
//! - [`Person`], [`Classroom`], [`ClassGroup`] and [`TimetableEntry`]: catalog
//! - [`Reservation`] and [`ReservationStatus`]: room bookings
//! - [`conflict::ConflictDetector`] and [`conflict::ConflictReport`]: overlap analysis
//! - [`OperationPlan`] and [`PlanExecutor`]: validated, transactional changes
//! - [`Error`] and [`Result`]: error handling
//!
//! ## Examples
//!
//! ```
//! use campus::{TimeInterval, TimeRange, Weekday};
//!
//! let a = TimeInterval::new(Weekday::Monday, TimeRange::parse("09:00", "10:30").unwrap());
//! let b = TimeInterval::new(Weekday::Monday, TimeRange::parse("10:30", "12:00").unwrap());
//! // Touching endpoints do not collide.
//! assert!(!campus::interval::overlaps(&a, &b));
//! ```

pub mod class_group;
pub mod classroom;
pub mod config;
pub mod conflict;
pub mod database;
pub mod error;
pub mod interval;
pub mod logging;
pub mod notify;
pub mod operations;
pub mod person;
pub mod report;
pub mod reservation;
pub mod settings;
pub mod sync;
pub mod timetable;

// Re-export key types at crate root for convenience
pub use class_group::{ClassGroup, ClassGroupDetails, ClassGroupId};
pub use classroom::{Classroom, ClassroomId, NewClassroom};
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Result};
pub use interval::{TimeInterval, TimeOfDay, TimeRange, Weekday};
pub use logging::{init_logger, LogLevel};
pub use operations::{
    ExecutionResult, OperationPlan, PlanAction, PlanExecutor, ReserveOptions, ReservePlan,
};
pub use person::{NewPerson, Person, PersonId, Role};
pub use reservation::{Reservation, ReservationId, ReservationStatus};
pub use settings::{Settings, SettingsHub};
pub use timetable::{EntryId, TimetableEntry};
