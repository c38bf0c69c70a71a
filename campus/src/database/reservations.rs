//! Reservation queries.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::classroom::ClassroomId;
use crate::error::{Error, Result};
use crate::person::PersonId;
use crate::reservation::{Reservation, ReservationId, ReservationStatus};

use super::rows::{
    date_column, date_to_sql, parse_column, range_columns, systemtime_to_unix_secs,
    unix_secs_to_systemtime,
};
use super::Database;

const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations (
        id, owner_id, classroom_id, date, start_minute, end_minute,
        purpose, notes, status, created_at, updated_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const UPDATE_RESERVATION: &str = r"
    UPDATE reservations
    SET classroom_id = ?, date = ?, start_minute = ?, end_minute = ?,
        purpose = ?, notes = ?, status = ?, updated_at = ?
    WHERE id = ?
";

const RESERVATION_COLUMNS: &str = r"
    id, owner_id, classroom_id, date, start_minute, end_minute,
    purpose, notes, status, created_at, updated_at
";

const SELECT_ACTIVE_FOR_SLOT: &str = r"
    SELECT id, owner_id, classroom_id, date, start_minute, end_minute,
           purpose, notes, status, created_at, updated_at
    FROM reservations
    WHERE classroom_id = ? AND date = ? AND status IN ('PENDING', 'APPROVED')
    ORDER BY start_minute
";

const COUNT_ACTIVE_FOR_OWNER_BETWEEN: &str = r"
    SELECT COUNT(*) FROM reservations
    WHERE owner_id = ? AND date >= ? AND date <= ? AND status IN ('PENDING', 'APPROVED')
";

/// Expects the columns of [`RESERVATION_COLUMNS`] in order.
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let id: String = row.get(0)?;
    let created_secs: i64 = row.get(9)?;
    let updated_secs: i64 = row.get(10)?;

    Reservation::builder(
        PersonId(row.get(1)?),
        ClassroomId(row.get(2)?),
        date_column(row, 3)?,
        range_columns(row, 4, 5)?,
    )
    .id(ReservationId::new(id))
    .purpose(row.get(6)?)
    .notes(row.get(7)?)
    .status(parse_column(row, 8)?)
    .created_at(unix_secs_to_systemtime(created_secs))
    .updated_at(unix_secs_to_systemtime(updated_secs))
    .build()
    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn select_reservations(
    conn: &Connection,
    filter: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Reservation>> {
    let sql = format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations {filter} ORDER BY date, start_minute, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let reservations = stmt
        .query_map(params, row_to_reservation)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(reservations)
}

impl Database {
    /// Inserts a new reservation row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including an id collision.
    pub fn insert_reservation(conn: &Connection, reservation: &Reservation) -> Result<()> {
        conn.execute(
            INSERT_RESERVATION,
            params![
                reservation.id().as_str(),
                reservation.owner().0,
                reservation.classroom().0,
                date_to_sql(reservation.date()),
                reservation.range().start().minutes(),
                reservation.range().end().minutes(),
                reservation.purpose(),
                reservation.notes(),
                reservation.status().as_str(),
                systemtime_to_unix_secs(reservation.created_at())?,
                systemtime_to_unix_secs(reservation.updated_at())?,
            ],
        )?;
        Ok(())
    }

    /// Writes every mutable column of an existing reservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the row is gone.
    pub fn update_reservation(conn: &Connection, reservation: &Reservation) -> Result<()> {
        let changed = conn.execute(
            UPDATE_RESERVATION,
            params![
                reservation.classroom().0,
                date_to_sql(reservation.date()),
                reservation.range().start().minutes(),
                reservation.range().end().minutes(),
                reservation.purpose(),
                reservation.notes(),
                reservation.status().as_str(),
                systemtime_to_unix_secs(reservation.updated_at())?,
                reservation.id().as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(Error::not_found(format!("reservation {}", reservation.id())));
        }
        Ok(())
    }

    /// Looks a reservation up by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_reservation(conn: &Connection, id: &ReservationId) -> Result<Option<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?");
        Ok(conn
            .query_row(&sql, [id.as_str()], row_to_reservation)
            .optional()?)
    }

    /// Looks a reservation up, failing with [`Error::NotFound`] when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or a database error.
    pub fn require_reservation(conn: &Connection, id: &ReservationId) -> Result<Reservation> {
        Self::get_reservation(conn, id)?
            .ok_or_else(|| Error::not_found(format!("reservation {id}")))
    }

    /// Every reservation, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservations(conn: &Connection) -> Result<Vec<Reservation>> {
        select_reservations(conn, "", [])
    }

    /// Reservations made by `owner`, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservations_by_owner(
        conn: &Connection,
        owner: PersonId,
    ) -> Result<Vec<Reservation>> {
        select_reservations(conn, "WHERE owner_id = ?", [owner.0])
    }

    /// Reservations in `status`, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservations_by_status(
        conn: &Connection,
        status: ReservationStatus,
    ) -> Result<Vec<Reservation>> {
        select_reservations(conn, "WHERE status = ?", [status.as_str()])
    }

    /// PENDING and APPROVED reservations of `classroom` on `date`.
    ///
    /// This is the candidate set for room conflict checks.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn active_reservations_for(
        conn: &Connection,
        classroom: ClassroomId,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>> {
        let mut stmt = conn.prepare(SELECT_ACTIVE_FOR_SLOT)?;
        let reservations = stmt
            .query_map(params![classroom.0, date_to_sql(date)], row_to_reservation)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(reservations)
    }

    /// Counts PENDING and APPROVED reservations of `owner` dated within
    /// `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_active_for_owner_between(
        conn: &Connection,
        owner: PersonId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<u32> {
        let count: u32 = conn.query_row(
            COUNT_ACTIVE_FOR_OWNER_BETWEEN,
            params![owner.0, date_to_sql(from), date_to_sql(to)],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
