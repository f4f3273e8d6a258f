use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, Row};

use shared_models::Availability;

use super::{date_column, format_date, format_time, time_column};
use crate::error::DatabaseError;

fn map_availability(row: &Row<'_>) -> rusqlite::Result<Availability> {
    Ok(Availability {
        id: row.get(0)?,
        doctor_id: row.get(1)?,
        date: date_column(row, 2)?,
        start_time: time_column(row, 3)?,
        end_time: time_column(row, 4)?,
    })
}

pub fn insert_availability(
    conn: &Connection,
    doctor_id: i64,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<Availability, DatabaseError> {
    conn.execute(
        "INSERT INTO availability (doctor_id, date, start_time, end_time) VALUES (?1, ?2, ?3, ?4)",
        params![doctor_id, format_date(date), format_time(start_time), format_time(end_time)],
    )?;

    Ok(Availability {
        id: conn.last_insert_rowid(),
        doctor_id,
        date,
        start_time,
        end_time,
    })
}

pub fn list_availability_for_doctor(conn: &Connection, doctor_id: i64) -> Result<Vec<Availability>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, doctor_id, date, start_time, end_time
         FROM availability WHERE doctor_id = ?1
         ORDER BY date, start_time, id",
    )?;
    let rows = stmt.query_map(params![doctor_id], map_availability)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
