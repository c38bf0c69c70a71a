//! Data directory initialization.
//!
//! Creates the data directory and an empty database, and optionally a
//! commented `config.yaml` listing every policy knob with its default.

use std::fs;
use std::path::PathBuf;

use crate::database::DATABASE_FILE_NAME;
use crate::error::{Error, Result};
use crate::{Database, DatabaseConfig};

/// Options for [`init_database`].
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Replace an existing database.
    pub overwrite: bool,
    /// Write a starter `config.yaml`.
    pub create_config: bool,
}

impl InitOptions {
    /// Initializes `data_dir` without overwriting or writing a config.
    #[must_use]
    pub const fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
        }
    }

    /// Sets whether an existing database is replaced.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether a starter config is written.
    #[must_use]
    pub const fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }
}

/// What [`init_database`] did.
#[derive(Debug)]
pub struct InitResult {
    /// The data directory did not exist before.
    pub data_dir_created: bool,
    /// A database was created or recreated.
    pub database_created: bool,
    /// A config file was written.
    pub config_created: bool,
    /// The data directory.
    pub data_dir: PathBuf,
}

const CONFIG_TEMPLATE: &str = r"# Campus scheduling configuration
#
# Every key is optional. Values here are overridden by campus.yaml and
# campus.local.yaml in a project directory, then by CAMPUS_* variables.

# Seconds to wait for the database write lock (default: 5)
# maximum_lock_wait_seconds: 5

# Refuse to create the data directory on first use
# disable_autoinit: false

# Reservation policy
# policy:
#   max_days_in_advance: 30
#   min_time_before_reservation: 1     # hours
#   max_hours_per_reservation: 4
#   max_reservations_per_week: 5
#   student_require_approval: true
#   professor_require_approval: false
#   email_notifications: true
#   reservation_created: true

# Store admin notifications in the database instead of only logging them
# notifications:
#   outbox: true
";

/// Initializes the data directory and database.
///
/// # Errors
///
/// Returns [`Error::Validation`] if a database already exists and
/// `overwrite` is not set, or an I/O or database error.
///
/// # Examples
///
/// ```no_run
/// use campus::operations::{init_database, InitOptions};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/campus-data")).with_create_config(true);
/// let result = init_database(&options).unwrap();
/// println!("database created: {}", result.database_created);
/// ```
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let mut result = InitResult {
        data_dir_created: false,
        database_created: false,
        config_created: false,
        data_dir: options.data_dir.clone(),
    };

    if !options.data_dir.exists() {
        fs::create_dir_all(&options.data_dir)?;
        result.data_dir_created = true;
    }

    let db_path = options.data_dir.join(DATABASE_FILE_NAME);
    if db_path.exists() {
        if !options.overwrite {
            return Err(Error::Validation {
                field: "database".into(),
                message: format!(
                    "a database already exists at {}; pass --overwrite to replace it",
                    db_path.display()
                ),
            });
        }
        fs::remove_file(&db_path)?;
        // WAL side files would otherwise be replayed into the new database
        for suffix in ["-wal", "-shm"] {
            let side = options.data_dir.join(format!("{DATABASE_FILE_NAME}{suffix}"));
            if side.exists() {
                fs::remove_file(side)?;
            }
        }
    }

    Database::open(DatabaseConfig::new(&db_path))?;
    result.database_created = true;
    log::info!("initialized database at {}", db_path.display());

    if options.create_config {
        let config_path = options.data_dir.join("config.yaml");
        if !config_path.exists() {
            fs::write(&config_path, CONFIG_TEMPLATE)?;
            result.config_created = true;
        }
    }

    Ok(result)
}
