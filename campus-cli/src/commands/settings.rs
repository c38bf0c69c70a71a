//! `settings show`: the effective reservation policy.

use crate::error::CliError;
use crate::utils::{load_configuration, GlobalOptions};
use clap::{Args, Subcommand};

/// Inspect reservation settings.
#[derive(Args)]
pub struct SettingsCommand {
    #[command(subcommand)]
    action: SettingsAction,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the policy after config files and environment are applied
    Show(ShowArgs),
}

#[derive(Args)]
struct ShowArgs {
    /// Print JSON instead of YAML
    #[arg(long)]
    json: bool,
}

impl SettingsCommand {
    /// Execute the settings command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let SettingsAction::Show(args) = self.action;
        let settings = load_configuration(global)?.settings();

        let text = if args.json {
            serde_json::to_string_pretty(&settings)
                .map_err(|e| CliError::Io(std::io::Error::other(e)))?
        } else {
            serde_yaml::to_string(&settings).map_err(|e| CliError::Config(e.to_string()))?
        };
        println!("{}", text.trim_end());
        Ok(())
    }
}
