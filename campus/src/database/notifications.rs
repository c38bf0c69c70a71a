//! Admin notification outbox.

use std::time::SystemTime;

use rusqlite::{params, Connection};
use serde::Serialize;

use crate::error::Result;
use crate::notify::AdminNotification;

use super::rows::{decode_error, systemtime_to_unix_secs, unix_secs_to_systemtime};
use super::Database;

const INSERT_NOTIFICATION: &str = r"
    INSERT INTO notifications (event, reservation_id, payload, created_at)
    VALUES (?, ?, ?, ?)
";

const LIST_NOTIFICATIONS: &str =
    "SELECT id, payload, created_at FROM notifications ORDER BY id";

/// A notification as stored in the outbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredNotification {
    /// Outbox sequence number.
    pub id: i64,
    /// When it was queued.
    pub created_at: SystemTime,
    /// The notification itself.
    #[serde(flatten)]
    pub notification: AdminNotification,
}

fn row_to_notification(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredNotification> {
    let payload: String = row.get(1)?;
    let created_secs: i64 = row.get(2)?;
    Ok(StoredNotification {
        id: row.get(0)?,
        created_at: unix_secs_to_systemtime(created_secs),
        notification: serde_json::from_str(&payload).map_err(|e| decode_error(1, e))?,
    })
}

impl Database {
    /// Queues a notification in the outbox.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails.
    pub fn insert_notification(conn: &Connection, notification: &AdminNotification) -> Result<i64> {
        conn.execute(
            INSERT_NOTIFICATION,
            params![
                notification.event.as_str(),
                notification.reservation.as_str(),
                serde_json::to_string(notification)?,
                systemtime_to_unix_secs(SystemTime::now())?,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Every queued notification, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a payload cannot be decoded.
    pub fn list_notifications(conn: &Connection) -> Result<Vec<StoredNotification>> {
        let mut stmt = conn.prepare(LIST_NOTIFICATIONS)?;
        let items = stmt
            .query_map([], row_to_notification)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(items)
    }
}
