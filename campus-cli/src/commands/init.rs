//! Init command implementation.
//!
//! Explicitly creates the data directory and an empty campus database.

use crate::error::CliError;
use crate::utils::{resolve_data_dir, GlobalOptions};
use campus::config::loader::USER_CONFIG_FILE;
use campus::database::DATABASE_FILE_NAME;
use campus::operations::{init_database, InitOptions};
use clap::Parser;

/// Initialize the campus data directory and database.
#[derive(Parser)]
#[command(about = "Initialize the campus data directory and database")]
pub struct InitCommand {
    /// Replace an existing database
    #[arg(long)]
    overwrite: bool,

    /// Write a commented starter config.yaml
    #[arg(long)]
    with_config: bool,

    /// Preview actions without executing
    #[arg(long)]
    dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = resolve_data_dir(global)?;

        if self.dry_run {
            println!("Dry-run mode: no changes will be made");
            println!("Would initialize campus in: {}", data_dir.display());
            if !data_dir.exists() {
                println!("  - Create data directory");
            }
            let db_path = data_dir.join(DATABASE_FILE_NAME);
            match (db_path.exists(), self.overwrite) {
                (true, true) => println!("  - Replace database: {}", db_path.display()),
                (true, false) => println!(
                    "  - ERROR: Database already exists (use --overwrite to replace): {}",
                    db_path.display()
                ),
                (false, _) => println!("  - Create database: {}", db_path.display()),
            }
            if self.with_config && !data_dir.join(USER_CONFIG_FILE).exists() {
                println!("  - Create configuration file");
            }
            return Ok(());
        }

        let options = InitOptions::new(data_dir)
            .with_overwrite(self.overwrite)
            .with_create_config(self.with_config);
        let result = init_database(&options)?;

        println!("Initialized campus in: {}", result.data_dir.display());
        if result.data_dir_created {
            println!("  - Created data directory");
        }
        if result.database_created {
            println!(
                "  - {} database",
                if self.overwrite { "Recreated" } else { "Created" }
            );
        }
        if result.config_created {
            println!("  - Created default configuration file");
        } else if self.with_config {
            println!("  - Configuration file already exists (not overwritten)");
        }
        Ok(())
    }
}
