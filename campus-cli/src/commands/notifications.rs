//! `notifications list`: the admin notification outbox.

use crate::error::CliError;
use crate::output::Listing;
use crate::utils::{
    format_timestamp, load_configuration, open_database, resolve_format, GlobalOptions,
};
use campus::config::OutputFormat;
use campus::database::StoredNotification;
use campus::Database;
use clap::{Args, Subcommand};

/// Column headers for the outbox listing.
const COLUMN_HEADERS: [&str; 6] = ["id", "created_at", "event", "reservation", "email", "message"];

/// Read queued admin notifications.
#[derive(Args)]
pub struct NotificationsCommand {
    #[command(subcommand)]
    action: NotificationsAction,
}

#[derive(Subcommand)]
enum NotificationsAction {
    /// List the outbox (filled when `notifications.outbox` is enabled)
    List(ListArgs),
}

#[derive(Args)]
struct ListArgs {
    /// Output format (table, json, csv, tsv)
    #[arg(long, env = "CAMPUS_OUTPUT_FORMAT")]
    format: Option<OutputFormat>,
}

fn notification_row(n: &StoredNotification) -> Vec<String> {
    vec![
        n.id.to_string(),
        format_timestamp(n.created_at),
        n.notification.event.to_string(),
        n.notification.reservation.to_string(),
        n.notification.email.to_string(),
        n.notification.message(),
    ]
}

impl NotificationsCommand {
    /// Execute the notifications command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let NotificationsAction::List(args) = self.action;
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;
        let queued = Database::list_notifications(db.connection())?;
        Listing::new(&COLUMN_HEADERS, &queued, notification_row)
            .print(resolve_format(args.format, &config))
    }
}
