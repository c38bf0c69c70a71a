//! `reservation` commands: the classroom booking lifecycle.

use crate::error::CliError;
use crate::output::{or_dash, Listing};
use crate::utils::{
    format_timestamp, load_configuration, open_database, resolve_format, run_plan, GlobalOptions,
};
use campus::config::OutputFormat;
use campus::operations::{
    CancelOptions, CancelPlan, EditOptions, EditPlan, ReviewOptions, ReviewPlan,
};
use campus::{
    ClassroomId, Database, PersonId, Reservation, ReservationId, ReservationStatus, ReserveOptions,
    ReservePlan,
};
use clap::{Args, Subcommand};

/// Column headers for reservation listings.
const COLUMN_HEADERS: [&str; 9] = [
    "id",
    "owner",
    "classroom",
    "date",
    "start",
    "end",
    "status",
    "purpose",
    "updated_at",
];

/// Manage classroom reservations.
#[derive(Args)]
pub struct ReservationCommand {
    #[command(subcommand)]
    action: ReservationAction,
}

#[derive(Subcommand)]
enum ReservationAction {
    /// Request a classroom and print the reservation id
    Create(CreateArgs),
    /// Change a pending reservation you own
    Edit(EditArgs),
    /// Cancel a reservation you own
    Cancel(ActorArgs),
    /// Approve a pending reservation (admins)
    Approve(ActorArgs),
    /// Reject a pending reservation (admins)
    Reject(ActorArgs),
    /// Show one reservation
    Show(ShowArgs),
    /// List reservations
    List(ListArgs),
}

#[derive(Args)]
struct CreateArgs {
    /// Requesting person id
    #[arg(long = "as", value_name = "PERSON_ID")]
    actor: i64,

    /// Classroom id
    #[arg(long)]
    classroom: i64,

    /// Date (yyyy-MM-dd)
    #[arg(long)]
    date: String,

    /// Start time (HH:MM)
    #[arg(long)]
    start: String,

    /// End time (HH:MM)
    #[arg(long)]
    end: String,

    /// Purpose
    #[arg(long)]
    purpose: Option<String>,

    /// Notes
    #[arg(long)]
    notes: Option<String>,

    /// Perform a dry run
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct EditArgs {
    /// Reservation id
    id: String,

    /// Owner's person id
    #[arg(long = "as", value_name = "PERSON_ID")]
    actor: i64,

    /// New classroom id
    #[arg(long)]
    classroom: Option<i64>,

    /// New date (yyyy-MM-dd)
    #[arg(long)]
    date: Option<String>,

    /// New start time (HH:MM)
    #[arg(long)]
    start: Option<String>,

    /// New end time (HH:MM)
    #[arg(long)]
    end: Option<String>,

    /// New purpose
    #[arg(long)]
    purpose: Option<String>,

    /// New notes
    #[arg(long)]
    notes: Option<String>,

    /// Perform a dry run
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct ActorArgs {
    /// Reservation id
    id: String,

    /// Acting person id
    #[arg(long = "as", value_name = "PERSON_ID")]
    actor: i64,

    /// Perform a dry run
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct ShowArgs {
    /// Reservation id
    id: String,

    /// Output format (table, json, csv, tsv)
    #[arg(long, env = "CAMPUS_OUTPUT_FORMAT")]
    format: Option<OutputFormat>,
}

#[derive(Args)]
struct ListArgs {
    /// Only reservations of this person
    #[arg(long, conflicts_with = "status")]
    owner: Option<i64>,

    /// Only reservations in this status
    #[arg(long, value_parser = parse_status)]
    status: Option<ReservationStatus>,

    /// Output format (table, json, csv, tsv)
    #[arg(long, env = "CAMPUS_OUTPUT_FORMAT")]
    format: Option<OutputFormat>,
}

fn parse_status(s: &str) -> Result<ReservationStatus, String> {
    s.parse::<ReservationStatus>().map_err(|e| e.to_string())
}

fn reservation_row(r: &Reservation) -> Vec<String> {
    vec![
        r.id().to_string(),
        r.owner().to_string(),
        r.classroom().to_string(),
        r.date().format("%Y-%m-%d").to_string(),
        r.range().start().to_string(),
        r.range().end().to_string(),
        r.status().to_string(),
        or_dash(r.purpose()),
        format_timestamp(r.updated_at()),
    ]
}

impl ReservationCommand {
    /// Execute the reservation command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let settings = config.settings();
        let mut db = open_database(global, &config)?;

        let (plan, dry_run) = match self.action {
            ReservationAction::Create(args) => {
                let options = ReserveOptions::new(
                    PersonId(args.actor),
                    ClassroomId(args.classroom),
                    args.date,
                    args.start,
                    args.end,
                )
                .with_purpose(args.purpose)
                .with_notes(args.notes);
                (
                    ReservePlan::new(options, &settings).build_plan(&db)?,
                    args.dry_run,
                )
            }
            ReservationAction::Edit(args) => {
                let id = ReservationId::new(args.id);
                let current = Database::require_reservation(db.connection(), &id)?;
                let options = EditOptions::new(
                    PersonId(args.actor),
                    id,
                    args.classroom.map_or(current.classroom(), ClassroomId),
                    args.date
                        .unwrap_or_else(|| current.date().format("%Y-%m-%d").to_string()),
                    args.start
                        .unwrap_or_else(|| current.range().start().to_string()),
                    args.end.unwrap_or_else(|| current.range().end().to_string()),
                )
                .with_purpose(args.purpose.or_else(|| current.purpose().map(str::to_string)))
                .with_notes(args.notes.or_else(|| current.notes().map(str::to_string)));
                (
                    EditPlan::new(options, &settings).build_plan(&db)?,
                    args.dry_run,
                )
            }
            ReservationAction::Cancel(args) => {
                let options = CancelOptions::new(PersonId(args.actor), ReservationId::new(args.id));
                (
                    CancelPlan::new(options, &settings).build_plan(&db)?,
                    args.dry_run,
                )
            }
            ReservationAction::Approve(args) => {
                let options =
                    ReviewOptions::approve(PersonId(args.actor), ReservationId::new(args.id));
                (ReviewPlan::new(options).build_plan(&db)?, args.dry_run)
            }
            ReservationAction::Reject(args) => {
                let options =
                    ReviewOptions::reject(PersonId(args.actor), ReservationId::new(args.id));
                (ReviewPlan::new(options).build_plan(&db)?, args.dry_run)
            }
            ReservationAction::Show(args) => {
                let reservation =
                    Database::require_reservation(db.connection(), &ReservationId::new(args.id))?;
                return Listing::new(&COLUMN_HEADERS, &[reservation], reservation_row)
                    .print(resolve_format(args.format, &config));
            }
            ReservationAction::List(args) => {
                let conn = db.connection();
                let reservations = match (args.owner, args.status) {
                    (Some(owner), _) => Database::list_reservations_by_owner(conn, PersonId(owner))?,
                    (None, Some(status)) => Database::list_reservations_by_status(conn, status)?,
                    (None, None) => Database::list_reservations(conn)?,
                };
                return Listing::new(&COLUMN_HEADERS, &reservations, reservation_row)
                    .print(resolve_format(args.format, &config));
            }
        };

        let Some(result) = run_plan(&mut db, &plan, &config, global, dry_run)? else {
            return Ok(());
        };
        if let Some(id) = &result.reservation {
            // Shell-friendly: the id alone on stdout.
            println!("{id}");
            if !global.quiet {
                let stored = Database::require_reservation(db.connection(), id)?;
                eprintln!("Reservation {id} is {}", stored.status());
            }
        }
        Ok(())
    }
}
