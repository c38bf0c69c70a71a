//! Main entry point for the campus CLI.
//!
//! Commands cover the whole scheduling engine:
//! - `person`, `classroom`: the catalog
//! - `group`: class groups with conflict-checked timetables
//! - `reservation`: classroom bookings and their review
//! - `timetable`: weekly views for students and professors

mod cli;
mod commands;
mod error;
mod output;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    campus::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
    };

    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Person(cmd) => cmd.execute(&global),
        cli::Command::Classroom(cmd) => cmd.execute(&global),
        cli::Command::Group(cmd) => cmd.execute(&global),
        cli::Command::Reservation(cmd) => cmd.execute(&global),
        cli::Command::Timetable(cmd) => cmd.execute(&global),
        cli::Command::Settings(cmd) => cmd.execute(&global),
        cli::Command::Notifications(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(details) = e.details() {
                eprint!("{details}");
            }
            std::process::exit(e.exit_code());
        }
    }
}
