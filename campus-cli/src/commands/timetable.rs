//! `timetable` commands: weekly views and a professor's own entries.

use crate::commands::group::{entry_row, ENTRY_HEADERS};
use crate::error::CliError;
use crate::output::Listing;
use crate::utils::{load_configuration, open_database, parse_entry, resolve_format, GlobalOptions};
use campus::config::OutputFormat;
use campus::operations::{add_professor_entry, professor_timetable, student_timetable};
use campus::PersonId;
use clap::{Args, Subcommand};

/// Show weekly timetables.
#[derive(Args)]
pub struct TimetableCommand {
    #[command(subcommand)]
    action: TimetableAction,
}

#[derive(Subcommand)]
enum TimetableAction {
    /// Every class of every group a student attends
    Student(ViewArgs),
    /// A professor's personal timetable
    Professor(ViewArgs),
    /// Add an entry a professor owns outside any class group
    Add(AddArgs),
}

#[derive(Args)]
struct ViewArgs {
    /// Person id
    id: i64,

    /// Output format (table, json, csv, tsv)
    #[arg(long, env = "CAMPUS_OUTPUT_FORMAT")]
    format: Option<OutputFormat>,
}

#[derive(Args)]
struct AddArgs {
    /// Professor id
    id: i64,

    /// Entry as DAY,START,END,TITLE[,LOCATION]
    #[arg(long = "entry", value_name = "ENTRY")]
    entry: String,

    /// Perform a dry run
    #[arg(long)]
    dry_run: bool,
}

impl TimetableCommand {
    /// Execute the timetable command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let (entries, format) = match self.action {
            TimetableAction::Student(args) => {
                (student_timetable(&db, PersonId(args.id))?, args.format)
            }
            TimetableAction::Professor(args) => {
                (professor_timetable(&db, PersonId(args.id))?, args.format)
            }
            TimetableAction::Add(args) => {
                let entry = parse_entry(&args.entry)?;
                if args.dry_run {
                    if !global.quiet {
                        eprintln!(
                            "Dry run - would add '{}' on {} for professor {}",
                            entry.title, entry.interval, args.id
                        );
                    }
                    return Ok(());
                }
                let stored = add_professor_entry(&db, PersonId(args.id), &entry)?;
                if let Some(id) = stored.id {
                    println!("{id}");
                }
                return Ok(());
            }
        };

        Listing::new(&ENTRY_HEADERS, &entries, entry_row).print(resolve_format(format, &config))
    }
}
