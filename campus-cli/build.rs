//! Build script for campus-cli.
//!
//! Generates the man page at build time using clap_mangen and places it in
//! OUT_DIR for inclusion in release builds.
//!
//! Build scripts cannot depend on the crate being built, so the command
//! structure is restated here.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// Keep in sync with src/cli.rs.
fn build_cli() -> Command {
    let sub = |name: &'static str, about: &'static str, actions: &[(&'static str, &'static str)]| {
        Command::new(name).about(about).subcommands(
            actions
                .iter()
                .map(|(action, about)| Command::new(*action).about(*about)),
        )
    };

    Command::new("campus")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Schedule class groups and reserve classrooms without conflicts")
        .long_about(
            "Command-line tool for weekly class timetables and dated classroom \
             reservations. Professor and student commitments are checked for \
             overlap before any schedule is stored.",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("CAMPUS_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the database lock wait (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("CAMPUS_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .subcommands(vec![
            Command::new("init").about("Initialize the data directory and database"),
            sub(
                "person",
                "Register and list people",
                &[("add", "Register a person"), ("list", "List people")],
            ),
            sub(
                "classroom",
                "Register classrooms and find free ones",
                &[
                    ("add", "Register a classroom"),
                    ("list", "List classrooms"),
                    ("available", "List classrooms free for a slot"),
                ],
            ),
            sub(
                "group",
                "Manage class groups, their timetable and members",
                &[
                    ("create", "Create a class group"),
                    ("update", "Change a group's details or professor"),
                    ("delete", "Delete a group"),
                    ("show", "Show one group with its timetable"),
                    ("list", "List groups"),
                    ("assign", "Assign or remove the professor"),
                    ("schedule", "Replace the weekly timetable"),
                    ("enroll", "Enroll a student"),
                    ("unenroll", "Unenroll a student"),
                    ("check", "Report conflicts for a schedule or candidate slot"),
                    ("resync", "Re-mirror a professor's groups into their timetable"),
                ],
            ),
            sub(
                "reservation",
                "Request, edit, cancel and review classroom reservations",
                &[
                    ("create", "Request a classroom"),
                    ("edit", "Change a pending reservation"),
                    ("cancel", "Cancel a reservation"),
                    ("approve", "Approve a pending reservation"),
                    ("reject", "Reject a pending reservation"),
                    ("show", "Show one reservation"),
                    ("list", "List reservations"),
                ],
            ),
            sub(
                "timetable",
                "Show weekly timetables",
                &[
                    ("student", "A student's classes"),
                    ("professor", "A professor's personal timetable"),
                    ("add", "Add a professor's own entry"),
                ],
            ),
            sub(
                "settings",
                "Inspect the reservation policy",
                &[("show", "Print the effective policy")],
            ),
            sub(
                "notifications",
                "Read queued admin notifications",
                &[("list", "List the outbox")],
            ),
            Command::new("completions").about("Generate shell completion scripts"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("campus.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
