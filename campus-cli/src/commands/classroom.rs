//! `classroom` commands: register rooms, list them, find free ones.

use crate::error::CliError;
use crate::output::Listing;
use crate::utils::{load_configuration, open_database, resolve_format, GlobalOptions};
use campus::config::OutputFormat;
use campus::operations::{find_available_classrooms, AvailabilityQuery};
use campus::{Classroom, Database, NewClassroom};
use clap::{Args, Subcommand};

/// Column headers for classroom listings.
const COLUMN_HEADERS: [&str; 5] = ["id", "room_number", "type", "capacity", "features"];

/// Manage classrooms.
#[derive(Args)]
pub struct ClassroomCommand {
    #[command(subcommand)]
    action: ClassroomAction,
}

#[derive(Subcommand)]
enum ClassroomAction {
    /// Register a classroom and print its id
    Add(AddArgs),
    /// List classrooms
    List(ListArgs),
    /// List classrooms free for a slot
    Available(AvailableArgs),
}

#[derive(Args)]
struct AddArgs {
    /// Room number (unique)
    #[arg(long)]
    room: String,

    /// Room type, e.g. Lecture or Lab
    #[arg(long = "type", value_name = "TYPE")]
    kind: String,

    /// Number of seats
    #[arg(long)]
    capacity: u32,

    /// Equipment, repeatable
    #[arg(long = "feature", value_name = "FEATURE")]
    features: Vec<String>,

    /// Perform a dry run
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct ListArgs {
    /// Output format (table, json, csv, tsv)
    #[arg(long, env = "CAMPUS_OUTPUT_FORMAT")]
    format: Option<OutputFormat>,
}

#[derive(Args)]
struct AvailableArgs {
    /// Date (yyyy-MM-dd)
    #[arg(long)]
    date: String,

    /// Start time (HH:MM)
    #[arg(long)]
    start: String,

    /// End time (HH:MM)
    #[arg(long)]
    end: String,

    /// Only rooms of this type
    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<String>,

    /// Minimum number of seats
    #[arg(long, default_value_t = 0)]
    min_capacity: u32,

    /// Output format (table, json, csv, tsv)
    #[arg(long, env = "CAMPUS_OUTPUT_FORMAT")]
    format: Option<OutputFormat>,
}

fn classroom_row(c: &Classroom) -> Vec<String> {
    vec![
        c.id.to_string(),
        c.room_number.clone(),
        c.kind.clone(),
        c.capacity.to_string(),
        c.features.join(";"),
    ]
}

impl ClassroomCommand {
    /// Execute the classroom command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        match self.action {
            ClassroomAction::Add(args) => {
                let classroom = NewClassroom {
                    room_number: args.room,
                    kind: args.kind,
                    capacity: args.capacity,
                    features: args.features,
                };
                if args.dry_run {
                    if !global.quiet {
                        eprintln!(
                            "Dry run - would register {} room {} ({} seats)",
                            classroom.kind, classroom.room_number, classroom.capacity
                        );
                    }
                    return Ok(());
                }
                let stored = Database::insert_classroom(db.connection(), &classroom)?;
                println!("{}", stored.id);
            }
            ClassroomAction::List(args) => {
                let rooms = Database::list_classrooms(db.connection())?;
                Listing::new(&COLUMN_HEADERS, &rooms, classroom_row)
                    .print(resolve_format(args.format, &config))?;
            }
            ClassroomAction::Available(args) => {
                let query = AvailabilityQuery::new(args.date, args.start, args.end)
                    .with_kind(args.kind)
                    .with_min_capacity(args.min_capacity);
                let rooms = find_available_classrooms(&db, &query)?;
                Listing::new(&COLUMN_HEADERS, &rooms, classroom_row)
                    .print(resolve_format(args.format, &config))?;
            }
        }
        Ok(())
    }
}
