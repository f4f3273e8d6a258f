use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use shared_models::{Appointment, AppointmentStatus};

use super::{date_column, enum_column, format_date, format_time, format_timestamp, time_column, timestamp_column};
use crate::error::DatabaseError;

const APPOINTMENT_COLUMNS: &str = "id, patient_id, doctor_id, date, time, status, created_at";

fn map_appointment(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        date: date_column(row, 3)?,
        time: time_column(row, 4)?,
        status: enum_column(row, 5)?,
        created_at: timestamp_column(row, 6)?,
    })
}

/// Insert a `booked` appointment. Fails with a constraint violation if the slot is already booked.
pub fn insert_booked_appointment(
    conn: &Connection,
    patient_id: i64,
    doctor_id: i64,
    date: NaiveDate,
    time: NaiveTime,
    created_at: DateTime<Utc>,
) -> Result<Appointment, DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (patient_id, doctor_id, date, time, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            patient_id,
            doctor_id,
            format_date(date),
            format_time(time),
            AppointmentStatus::Booked.as_str(),
            format_timestamp(created_at),
        ],
    )?;

    let id = conn.last_insert_rowid();
    get_appointment(conn, id)?.ok_or_else(|| DatabaseError::not_found("appointment", id))
}

pub fn get_appointment(conn: &Connection, id: i64) -> Result<Option<Appointment>, DatabaseError> {
    let appointment = conn
        .query_row(
            &format!("SELECT {} FROM appointments WHERE id = ?1", APPOINTMENT_COLUMNS),
            params![id],
            map_appointment,
        )
        .optional()?;
    Ok(appointment)
}

/// The booked appointment occupying a slot, if any.
pub fn find_booked_in_slot(
    conn: &Connection,
    doctor_id: i64,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<Option<Appointment>, DatabaseError> {
    let appointment = conn
        .query_row(
            &format!(
                "SELECT {} FROM appointments
                 WHERE doctor_id = ?1 AND date = ?2 AND time = ?3 AND status = ?4
                 LIMIT 1",
                APPOINTMENT_COLUMNS
            ),
            params![
                doctor_id,
                format_date(date),
                format_time(time),
                AppointmentStatus::Booked.as_str()
            ],
            map_appointment,
        )
        .optional()?;
    Ok(appointment)
}

pub fn update_status(conn: &Connection, id: i64, status: AppointmentStatus) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE appointments SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    if updated == 0 {
        return Err(DatabaseError::not_found("appointment", id));
    }
    Ok(())
}

pub fn list_for_patient(conn: &Connection, patient_id: i64) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM appointments WHERE patient_id = ?1 ORDER BY id",
        APPOINTMENT_COLUMNS
    ))?;
    let rows = stmt.query_map(params![patient_id], map_appointment)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn list_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM appointments ORDER BY id", APPOINTMENT_COLUMNS))?;
    let rows = stmt.query_map([], map_appointment)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn count_appointments(conn: &Connection) -> Result<i64, DatabaseError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))?)
}

pub fn count_booked_in_slot(
    conn: &Connection,
    doctor_id: i64,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<i64, DatabaseError> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM appointments
         WHERE doctor_id = ?1 AND date = ?2 AND time = ?3 AND status = 'booked'",
        params![doctor_id, format_date(date), format_time(time)],
        |row| row.get(0),
    )?)
}
