//! CLI structure and command definitions.
//!
//! Global options and subcommands, via clap's derive macros.

use crate::commands::{
    ClassroomCommand, CompletionsCommand, GroupCommand, InitCommand, NotificationsCommand,
    PersonCommand, ReservationCommand, SettingsCommand, TimetableCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for classroom reservations and class timetables.
#[derive(Parser)]
#[command(name = "campus")]
#[command(
    version,
    about = "Schedule class groups and reserve classrooms without conflicts",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "CAMPUS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the database lock wait (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "CAMPUS_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(long, global = true)]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Register and list people
    Person(PersonCommand),

    /// Register classrooms and find free ones
    Classroom(ClassroomCommand),

    /// Manage class groups, their timetable and members
    Group(GroupCommand),

    /// Request, edit, cancel and review classroom reservations
    Reservation(ReservationCommand),

    /// Show weekly timetables
    Timetable(TimetableCommand),

    /// Inspect the reservation policy
    Settings(SettingsCommand),

    /// Read queued admin notifications
    Notifications(NotificationsCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
