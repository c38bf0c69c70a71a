//! CLI command implementations.
//!
//! - `init`: create the data directory and database
//! - `person`: register and list people
//! - `classroom`: register rooms and search free ones
//! - `group`: class groups, their timetable and members
//! - `reservation`: the classroom booking lifecycle
//! - `timetable`: weekly views
//! - `settings`: the effective reservation policy
//! - `notifications`: the admin outbox
//! - `completions`: shell completion scripts

pub mod classroom;
pub mod completions;
pub mod group;
pub mod init;
pub mod notifications;
pub mod person;
pub mod reservation;
pub mod settings;
pub mod timetable;

pub use classroom::ClassroomCommand;
pub use completions::CompletionsCommand;
pub use group::GroupCommand;
pub use init::InitCommand;
pub use notifications::NotificationsCommand;
pub use person::PersonCommand;
pub use reservation::ReservationCommand;
pub use settings::SettingsCommand;
pub use timetable::TimetableCommand;
