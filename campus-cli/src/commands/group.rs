//! `group` commands: class groups, their timetable and their members.
//!
//! Every write goes through a library plan, so professor and student
//! conflicts are caught before anything is stored.

use crate::error::CliError;
use crate::output::{or_dash, Listing};
use crate::utils::{
    collect_entries, load_configuration, open_database, resolve_format, run_plan, GlobalOptions,
};
use campus::config::OutputFormat;
use campus::operations::{
    check_group_schedule, CreateGroupOptions, CreateGroupPlan, DeleteGroupPlan, EnrollPlan,
    OperationPlan, ResyncPlan, ScheduleGroupPlan, UnenrollPlan, UpdateGroupOptions,
    UpdateGroupPlan,
};
use campus::report::{suggest_alternatives, summary_message};
use campus::{
    ClassGroup, ClassGroupDetails, ClassGroupId, Database, PersonId, TimeInterval, TimetableEntry,
};
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Column headers for group listings.
const GROUP_HEADERS: [&str; 7] = [
    "id",
    "course_code",
    "name",
    "professor",
    "students",
    "entries",
    "semester",
];

/// Column headers for timetable entries.
pub const ENTRY_HEADERS: [&str; 6] = ["day", "start", "end", "title", "location", "type"];

/// Manage class groups.
#[derive(Args)]
pub struct GroupCommand {
    #[command(subcommand)]
    action: GroupAction,
}

#[derive(Subcommand)]
enum GroupAction {
    /// Create a class group and print its id
    Create(CreateArgs),
    /// Change a group's details or professor
    Update(UpdateArgs),
    /// Delete a group and remove its entries from the professor's timetable
    Delete(TargetArgs),
    /// Show one group with its timetable
    Show(ShowArgs),
    /// List groups
    List(ListArgs),
    /// Assign or remove the professor
    Assign(AssignArgs),
    /// Replace the weekly timetable
    Schedule(ScheduleArgs),
    /// Enroll a student
    Enroll(MemberArgs),
    /// Unenroll a student
    Unenroll(MemberArgs),
    /// Report conflicts for the group's schedule or one candidate slot
    Check(CheckArgs),
    /// Re-mirror every group a professor teaches into their timetable
    Resync(ResyncArgs),
}

#[derive(Args)]
struct DetailArgs {
    /// Description
    #[arg(long)]
    description: Option<String>,

    /// Branch identifier
    #[arg(long)]
    branch_id: Option<i64>,

    /// Academic year, e.g. 2024-2025
    #[arg(long)]
    academic_year: Option<String>,

    /// Semester
    #[arg(long)]
    semester: Option<String>,
}

#[derive(Args)]
struct EntryArgs {
    /// Timetable entry as DAY,START,END,TITLE[,LOCATION]; repeatable
    #[arg(long = "entry", value_name = "ENTRY")]
    entries: Vec<String>,

    /// YAML file with a list of timetable entries
    #[arg(long, value_name = "PATH")]
    entries_file: Option<PathBuf>,
}

#[derive(Args)]
struct CreateArgs {
    /// Group name
    #[arg(long)]
    name: String,

    /// Course code; mirrored entries are titled "<code>: <title>"
    #[arg(long)]
    course_code: String,

    #[command(flatten)]
    details: DetailArgs,

    /// Professor id
    #[arg(long)]
    professor: Option<i64>,

    /// Student id; repeatable
    #[arg(long = "student", value_name = "ID")]
    students: Vec<i64>,

    #[command(flatten)]
    schedule: EntryArgs,

    /// Perform a dry run
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct UpdateArgs {
    /// Group id
    id: i64,

    /// New name
    #[arg(long)]
    name: Option<String>,

    /// New course code
    #[arg(long)]
    course_code: Option<String>,

    #[command(flatten)]
    details: DetailArgs,

    /// New professor id
    #[arg(long, conflicts_with = "no_professor")]
    professor: Option<i64>,

    /// Remove the professor
    #[arg(long)]
    no_professor: bool,

    /// Perform a dry run
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct TargetArgs {
    /// Group id
    id: i64,

    /// Perform a dry run
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct ShowArgs {
    /// Group id
    id: i64,

    /// Output format (table, json, csv, tsv)
    #[arg(long, env = "CAMPUS_OUTPUT_FORMAT")]
    format: Option<OutputFormat>,
}

#[derive(Args)]
struct ListArgs {
    /// Only groups taught by this professor
    #[arg(long, conflicts_with = "student")]
    professor: Option<i64>,

    /// Only groups this student attends
    #[arg(long)]
    student: Option<i64>,

    /// Output format (table, json, csv, tsv)
    #[arg(long, env = "CAMPUS_OUTPUT_FORMAT")]
    format: Option<OutputFormat>,
}

#[derive(Args)]
struct AssignArgs {
    /// Group id
    id: i64,

    /// Professor id
    #[arg(long, required_unless_present = "none")]
    professor: Option<i64>,

    /// Leave the group without a professor
    #[arg(long, conflicts_with = "professor")]
    none: bool,

    /// Perform a dry run
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct ScheduleArgs {
    /// Group id
    id: i64,

    #[command(flatten)]
    schedule: EntryArgs,

    /// Perform a dry run
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct MemberArgs {
    /// Group id
    id: i64,

    /// Student id
    #[arg(long)]
    student: i64,

    /// Perform a dry run
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// Group id
    id: i64,

    /// Candidate day; checks the stored schedule when omitted
    #[arg(long, requires_all = ["start", "end"])]
    day: Option<String>,

    /// Candidate start (HH:MM)
    #[arg(long, requires = "day")]
    start: Option<String>,

    /// Candidate end (HH:MM)
    #[arg(long, requires = "day")]
    end: Option<String>,
}

#[derive(Args)]
struct ResyncArgs {
    /// Professor id
    #[arg(long)]
    professor: i64,

    /// Perform a dry run
    #[arg(long)]
    dry_run: bool,
}

impl DetailArgs {
    fn apply(self, details: &mut ClassGroupDetails) {
        if self.description.is_some() {
            details.description = self.description;
        }
        if self.branch_id.is_some() {
            details.branch_id = self.branch_id;
        }
        if self.academic_year.is_some() {
            details.academic_year = self.academic_year;
        }
        if self.semester.is_some() {
            details.semester = self.semester;
        }
    }
}

impl EntryArgs {
    fn collect(&self) -> Result<Vec<TimetableEntry>, CliError> {
        collect_entries(&self.entries, self.entries_file.as_deref())
    }
}

fn group_row(g: &ClassGroup) -> Vec<String> {
    vec![
        g.id.to_string(),
        g.details.course_code.clone(),
        g.details.name.clone(),
        g.professor.map_or_else(|| "-".to_string(), |p| p.to_string()),
        g.students.len().to_string(),
        g.entries.len().to_string(),
        or_dash(g.details.semester.as_deref()),
    ]
}

/// One timetable entry as a table row.
pub fn entry_row(e: &TimetableEntry) -> Vec<String> {
    vec![
        e.interval.day().to_string(),
        e.interval.start().to_string(),
        e.interval.end().to_string(),
        e.title.clone(),
        or_dash(e.location.as_deref()),
        e.kind.clone(),
    ]
}

impl GroupCommand {
    /// Execute the group command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        // Writes build a plan; reads return early.
        let (plan, dry_run): (OperationPlan, bool) = match self.action {
            GroupAction::Create(args) => {
                let mut details = ClassGroupDetails::new(args.name, args.course_code);
                args.details.apply(&mut details);
                let options = CreateGroupOptions::new(details)
                    .with_professor(args.professor.map(PersonId))
                    .with_students(args.students.into_iter().map(PersonId).collect())
                    .with_entries(args.schedule.collect()?);
                (CreateGroupPlan::new(options).build_plan(&db)?, args.dry_run)
            }
            GroupAction::Update(args) => {
                let id = ClassGroupId(args.id);
                let current = Database::require_class_group(db.connection(), id)?;
                let mut details = current.details;
                if let Some(name) = args.name {
                    details.name = name;
                }
                if let Some(code) = args.course_code {
                    details.course_code = code;
                }
                args.details.apply(&mut details);
                let professor = if args.no_professor {
                    None
                } else {
                    args.professor.map(PersonId).or(current.professor)
                };
                let options = UpdateGroupOptions::new(id, details, professor);
                (UpdateGroupPlan::new(options).build_plan(&db)?, args.dry_run)
            }
            GroupAction::Delete(args) => (
                DeleteGroupPlan::new(ClassGroupId(args.id)).build_plan(&db)?,
                args.dry_run,
            ),
            GroupAction::Assign(args) => {
                let professor = if args.none {
                    None
                } else {
                    args.professor.map(PersonId)
                };
                let options = UpdateGroupOptions::assign_professor(ClassGroupId(args.id), professor);
                (UpdateGroupPlan::new(options).build_plan(&db)?, args.dry_run)
            }
            GroupAction::Schedule(args) => (
                ScheduleGroupPlan::new(ClassGroupId(args.id), args.schedule.collect()?)
                    .build_plan(&db)?,
                args.dry_run,
            ),
            GroupAction::Enroll(args) => (
                EnrollPlan::new(ClassGroupId(args.id), PersonId(args.student)).build_plan(&db)?,
                args.dry_run,
            ),
            GroupAction::Unenroll(args) => (
                UnenrollPlan::new(ClassGroupId(args.id), PersonId(args.student))
                    .build_plan(&db)?,
                args.dry_run,
            ),
            GroupAction::Resync(args) => (
                ResyncPlan::new(PersonId(args.professor)).build_plan(&db)?,
                args.dry_run,
            ),
            GroupAction::Show(args) => {
                let group = Database::require_class_group(db.connection(), ClassGroupId(args.id))?;
                return show_group(&group, resolve_format(args.format, &config));
            }
            GroupAction::List(args) => {
                let conn = db.connection();
                let groups = match (args.professor, args.student) {
                    (Some(p), _) => Database::class_groups_for_professor(conn, PersonId(p))?,
                    (None, Some(s)) => Database::class_groups_for_student(conn, PersonId(s))?,
                    (None, None) => Database::list_class_groups(conn)?,
                };
                return Listing::new(&GROUP_HEADERS, &groups, group_row)
                    .print(resolve_format(args.format, &config));
            }
            GroupAction::Check(args) => return check(&db, &args),
        };

        if let Some(result) = run_plan(&mut db, &plan, &config, global, dry_run)? {
            if let Some(id) = result.class_group {
                println!("{id}");
            } else if !global.quiet && !result.actions_taken.is_empty() {
                eprintln!("{}", plan.description);
            }
        }
        Ok(())
    }
}

fn show_group(group: &ClassGroup, format: OutputFormat) -> Result<(), CliError> {
    if format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(group)
            .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
        println!("{json}");
        return Ok(());
    }
    if format == OutputFormat::Table {
        let d = &group.details;
        println!("Class group {}: {} ({})", group.id, d.name, d.course_code);
        if let Some(description) = &d.description {
            println!("Description: {description}");
        }
        if let (Some(year), Some(semester)) = (&d.academic_year, &d.semester) {
            println!("Term: {year} {semester}");
        }
        println!(
            "Professor: {}",
            group.professor.map_or_else(|| "-".to_string(), |p| p.to_string())
        );
        let students: Vec<String> = group.students.iter().map(ToString::to_string).collect();
        if students.is_empty() {
            println!("Students: -");
        } else {
            println!("Students: {}", students.join(", "));
        }
        println!();
    }
    Listing::new(&ENTRY_HEADERS, &group.entries, entry_row).print(format)
}

fn check(db: &Database, args: &CheckArgs) -> Result<(), CliError> {
    let candidate = match (&args.day, &args.start, &args.end) {
        (Some(day), Some(start), Some(end)) => Some(TimeInterval::parse(day, start, end)?),
        _ => None,
    };
    let report = check_group_schedule(db, ClassGroupId(args.id), candidate.as_ref())?;
    if report.is_empty() {
        println!("No conflicts");
        return Ok(());
    }

    print!("{}", campus::report::format_conflicts(&report));
    if let Some(slot) = &candidate {
        for alternative in suggest_alternatives(slot) {
            println!("Alternative: {}", alternative.label);
        }
    }
    Err(CliError::SemanticFailure(summary_message(&report)))
}
