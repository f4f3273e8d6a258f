use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use shared_models::Notification;

use super::{format_timestamp, timestamp_column};
use crate::error::DatabaseError;

const NOTIFICATION_COLUMNS: &str = "n.id, n.appointment_id, n.message, n.sent, n.created_at";

/// A notification claimed by a dispatch run, with its recipient resolved
/// through appointment -> patient. `recipient_email` is `None` when either link is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimedNotification {
    pub notification: Notification,
    pub recipient_email: Option<String>,
}

fn map_notification(row: &Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get(0)?,
        appointment_id: row.get(1)?,
        message: row.get(2)?,
        sent: row.get(3)?,
        created_at: timestamp_column(row, 4)?,
    })
}

pub fn insert_notification(
    conn: &Connection,
    appointment_id: Option<i64>,
    message: &str,
    created_at: DateTime<Utc>,
) -> Result<Notification, DatabaseError> {
    conn.execute(
        "INSERT INTO notifications (appointment_id, message, sent, created_at) VALUES (?1, ?2, 0, ?3)",
        params![appointment_id, message, format_timestamp(created_at)],
    )?;

    Ok(Notification {
        id: conn.last_insert_rowid(),
        appointment_id,
        message: message.to_string(),
        sent: false,
        created_at,
    })
}

/// Claim every unsent notification that is unclaimed or whose claim predates
/// `stale_before`. Returns how many rows were claimed for `claim_token`.
pub fn claim_pending(
    conn: &Connection,
    claim_token: &str,
    now: DateTime<Utc>,
    stale_before: DateTime<Utc>,
) -> Result<usize, DatabaseError> {
    let claimed = conn.execute(
        "UPDATE notifications
         SET claimed_by = ?1, claimed_at = ?2
         WHERE sent = 0 AND (claimed_by IS NULL OR claimed_at < ?3)",
        params![claim_token, format_timestamp(now), format_timestamp(stale_before)],
    )?;
    Ok(claimed)
}

pub fn list_claimed(conn: &Connection, claim_token: &str) -> Result<Vec<ClaimedNotification>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {}, acc.email
         FROM notifications n
         LEFT JOIN appointments a ON a.id = n.appointment_id
         LEFT JOIN accounts acc ON acc.id = a.patient_id
         WHERE n.claimed_by = ?1 AND n.sent = 0
         ORDER BY n.id",
        NOTIFICATION_COLUMNS
    ))?;
    let rows = stmt.query_map(params![claim_token], |row| {
        Ok(ClaimedNotification {
            notification: map_notification(row)?,
            recipient_email: row.get(5)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Flip `sent` on one row, but only while this run still owns its claim.
pub fn mark_sent(conn: &Connection, id: i64, claim_token: &str) -> Result<bool, DatabaseError> {
    let updated = conn.execute(
        "UPDATE notifications SET sent = 1 WHERE id = ?1 AND claimed_by = ?2 AND sent = 0",
        params![id, claim_token],
    )?;
    Ok(updated == 1)
}

pub fn list_pending(conn: &Connection) -> Result<Vec<Notification>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM notifications n WHERE n.sent = 0 ORDER BY n.id",
        NOTIFICATION_COLUMNS
    ))?;
    let rows = stmt.query_map([], map_notification)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn list_for_appointment(conn: &Connection, appointment_id: i64) -> Result<Vec<Notification>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM notifications n WHERE n.appointment_id = ?1 ORDER BY n.id",
        NOTIFICATION_COLUMNS
    ))?;
    let rows = stmt.query_map(params![appointment_id], map_notification)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn count_notifications(conn: &Connection) -> Result<i64, DatabaseError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM notifications", [], |row| row.get(0))?)
}
