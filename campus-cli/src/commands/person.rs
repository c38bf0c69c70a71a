//! `person` commands: register and list people.

use crate::error::CliError;
use crate::output::Listing;
use crate::utils::{load_configuration, open_database, resolve_format, GlobalOptions};
use campus::config::OutputFormat;
use campus::{Database, NewPerson, Person, Role};
use clap::{Args, Subcommand};

/// Column headers for person listings.
const COLUMN_HEADERS: [&str; 5] = ["id", "first_name", "last_name", "email", "role"];

/// Manage people.
#[derive(Args)]
pub struct PersonCommand {
    #[command(subcommand)]
    action: PersonAction,
}

#[derive(Subcommand)]
enum PersonAction {
    /// Register a person and print their id
    Add(AddArgs),
    /// List people
    List(ListArgs),
}

#[derive(Args)]
struct AddArgs {
    /// First name
    #[arg(long)]
    first_name: String,

    /// Last name
    #[arg(long)]
    last_name: String,

    /// Email address (unique)
    #[arg(long)]
    email: String,

    /// ADMIN, PROFESSOR or STUDENT
    #[arg(long, value_parser = parse_role)]
    role: Role,

    /// Perform a dry run
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct ListArgs {
    /// Only people with this role
    #[arg(long, value_parser = parse_role)]
    role: Option<Role>,

    /// Output format (table, json, csv, tsv)
    #[arg(long, env = "CAMPUS_OUTPUT_FORMAT")]
    format: Option<OutputFormat>,
}

/// Clap value parser for roles.
pub fn parse_role(s: &str) -> Result<Role, String> {
    s.parse::<Role>().map_err(|e| e.to_string())
}

fn person_row(p: &Person) -> Vec<String> {
    vec![
        p.id.to_string(),
        p.first_name.clone(),
        p.last_name.clone(),
        p.email.clone(),
        p.role.to_string(),
    ]
}

impl PersonCommand {
    /// Execute the person command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        match self.action {
            PersonAction::Add(args) => {
                let person = NewPerson {
                    first_name: args.first_name,
                    last_name: args.last_name,
                    email: args.email,
                    role: args.role,
                };
                if args.dry_run {
                    if !global.quiet {
                        eprintln!(
                            "Dry run - would register {} {} <{}> as {}",
                            person.first_name, person.last_name, person.email, person.role
                        );
                    }
                    return Ok(());
                }
                let stored = Database::insert_person(db.connection(), &person)?;
                println!("{}", stored.id);
            }
            PersonAction::List(args) => {
                let people = Database::list_persons(db.connection(), args.role)?;
                Listing::new(&COLUMN_HEADERS, &people, person_row)
                    .print(resolve_format(args.format, &config))?;
            }
        }
        Ok(())
    }
}
