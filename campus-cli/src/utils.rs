//! Utility functions for CLI operations.
//!
//! Configuration loading, database opening, plan execution and the small
//! argument parsers shared by several commands.

use crate::error::CliError;
use campus::config::OutputFormat;
use campus::notify::{LogNotifier, Notifier, OutboxNotifier};
use campus::operations::{ExecutionResult, OperationPlan, PlanExecutor};
use campus::{Config, ConfigBuilder, Database, DatabaseConfig, TimeInterval, TimetableEntry};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // verbose is consumed by the logger in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,
}

/// Resolve the data directory: `--data-dir` / `CAMPUS_DATA_DIR`, else
/// `~/.campus`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match &global.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => campus::database::default_data_dir().map_err(CliError::from),
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Global options (highest priority)
/// 2. Environment variables
/// 3. Configuration files
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;
    let mut builder = ConfigBuilder::new().with_data_dir(&data_dir);

    if let Some(seconds) = global.busy_timeout {
        builder = builder.with_config(Config {
            maximum_lock_wait_seconds: Some(u64::from(seconds)),
            ..Config::default()
        });
    }
    if global.disable_autoinit {
        builder = builder.with_config(Config {
            disable_autoinit: Some(true),
            ..Config::default()
        });
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

/// Open database with configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = resolve_data_dir(global)?.join(campus::database::DATABASE_FILE_NAME);

    let autoinit_disabled = config.disable_autoinit.unwrap_or(false);
    if !db_path.exists() && autoinit_disabled {
        return Err(CliError::NoDataDirectory);
    }

    let mut db_config = DatabaseConfig::new(db_path)
        .with_busy_timeout(Duration::from_secs(config.lock_wait_seconds()));
    if autoinit_disabled {
        db_config = db_config.without_auto_create();
    }

    Database::open(db_config).map_err(CliError::from)
}

/// Output format: the flag if given, else the configured default, else a
/// table.
pub fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.or(config.output_format).unwrap_or(OutputFormat::Table)
}

/// Print a plan without executing it.
pub fn print_dry_run(plan: &OperationPlan, global: &GlobalOptions) {
    if global.quiet {
        return;
    }
    eprintln!("Dry run - would perform the following actions:");
    for (i, action) in plan.actions.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, action.description());
    }
    if !plan.warnings.is_empty() {
        eprintln!("Warnings:");
        for warning in &plan.warnings {
            eprintln!("  - {warning}");
        }
    }
}

/// Run a plan, or describe it under `--dry-run`.
///
/// Notifications go to the database outbox when the config asks for it,
/// otherwise to the log. Plan warnings are printed to stderr unless
/// `--quiet`.
pub fn run_plan(
    db: &mut Database,
    plan: &OperationPlan,
    config: &Config,
    global: &GlobalOptions,
    dry_run: bool,
) -> Result<Option<ExecutionResult>, CliError> {
    if dry_run {
        print_dry_run(plan, global);
        return Ok(None);
    }

    let outbox = OutboxNotifier::new(db.config().clone());
    let notifier: &dyn Notifier = if config.uses_outbox() {
        &outbox
    } else {
        &LogNotifier
    };

    let result = PlanExecutor::new(db)
        .with_notifier(notifier)
        .execute(plan)
        .map_err(CliError::from)?;

    if !global.quiet {
        for warning in &result.warnings {
            eprintln!("Warning: {warning}");
        }
    }
    Ok(Some(result))
}

/// Parse a `DAY,START,END,TITLE[,LOCATION]` timetable entry.
///
/// # Examples
///
/// `Monday,09:00,10:30,Lecture 1,B-204`
pub fn parse_entry(raw: &str) -> Result<TimetableEntry, CliError> {
    let parts: Vec<&str> = raw.splitn(5, ',').map(str::trim).collect();
    if parts.len() < 4 || parts[3].is_empty() {
        return Err(CliError::InvalidArguments(format!(
            "entry '{raw}' must look like DAY,START,END,TITLE[,LOCATION]"
        )));
    }
    let interval = TimeInterval::parse(parts[0], parts[1], parts[2])?;
    let entry = TimetableEntry::new(interval, parts[3]);
    Ok(match parts.get(4) {
        Some(location) if !location.is_empty() => entry.with_location(*location),
        _ => entry,
    })
}

/// Read timetable entries from a YAML list.
pub fn load_entries_file(path: &Path) -> Result<Vec<TimetableEntry>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(|e| {
        CliError::InvalidArguments(format!("{}: invalid timetable: {e}", path.display()))
    })
}

/// Collect entries from `--entry` flags and an optional `--entries-file`.
pub fn collect_entries(
    raw_entries: &[String],
    file: Option<&Path>,
) -> Result<Vec<TimetableEntry>, CliError> {
    let mut entries = match file {
        Some(path) => load_entries_file(path)?,
        None => Vec::new(),
    };
    for raw in raw_entries {
        entries.push(parse_entry(raw)?);
    }
    Ok(entries)
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: std::time::SystemTime) -> String {
    use chrono::{DateTime, Utc};
    let dt: DateTime<Utc> = ts.into();
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}
