use rusqlite::{params, Connection, OptionalExtension, Row};

use shared_models::{Doctor, DoctorListing};

use crate::error::DatabaseError;

fn map_doctor(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        name: row.get(1)?,
        specialty: row.get(2)?,
        clinic_id: row.get(3)?,
    })
}

fn map_listing(row: &Row<'_>) -> rusqlite::Result<DoctorListing> {
    Ok(DoctorListing {
        id: row.get(0)?,
        name: row.get(1)?,
        specialty: row.get(2)?,
        clinic: row.get(3)?,
    })
}

pub fn insert_doctor(
    conn: &Connection,
    name: &str,
    specialty: Option<&str>,
    clinic_id: Option<i64>,
) -> Result<Doctor, DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (name, specialty, clinic_id) VALUES (?1, ?2, ?3)",
        params![name, specialty, clinic_id],
    )?;

    Ok(Doctor {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        specialty: specialty.map(str::to_string),
        clinic_id,
    })
}

pub fn get_doctor(conn: &Connection, id: i64) -> Result<Option<Doctor>, DatabaseError> {
    let doctor = conn
        .query_row(
            "SELECT id, name, specialty, clinic_id FROM doctors WHERE id = ?1",
            params![id],
            map_doctor,
        )
        .optional()?;
    Ok(doctor)
}

/// One doctor with the clinic name resolved (absent when unset or dangling).
pub fn get_doctor_listing(conn: &Connection, id: i64) -> Result<Option<DoctorListing>, DatabaseError> {
    let listing = conn
        .query_row(
            "SELECT d.id, d.name, d.specialty, c.name
             FROM doctors d LEFT JOIN clinics c ON c.id = d.clinic_id
             WHERE d.id = ?1",
            params![id],
            map_listing,
        )
        .optional()?;
    Ok(listing)
}

pub fn list_doctor_listings(conn: &Connection) -> Result<Vec<DoctorListing>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT d.id, d.name, d.specialty, c.name
         FROM doctors d LEFT JOIN clinics c ON c.id = d.clinic_id
         ORDER BY d.id",
    )?;
    let rows = stmt.query_map([], map_listing)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn count_doctors(conn: &Connection) -> Result<i64, DatabaseError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))?)
}
