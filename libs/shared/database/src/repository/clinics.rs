use rusqlite::{params, Connection, OptionalExtension, Row};

use shared_models::Clinic;

use crate::error::DatabaseError;

fn map_clinic(row: &Row<'_>) -> rusqlite::Result<Clinic> {
    Ok(Clinic {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
    })
}

pub fn insert_clinic(conn: &Connection, name: &str, address: Option<&str>) -> Result<Clinic, DatabaseError> {
    conn.execute(
        "INSERT INTO clinics (name, address) VALUES (?1, ?2)",
        params![name, address],
    )?;

    Ok(Clinic {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        address: address.map(str::to_string),
    })
}

pub fn get_clinic(conn: &Connection, id: i64) -> Result<Option<Clinic>, DatabaseError> {
    let clinic = conn
        .query_row(
            "SELECT id, name, address FROM clinics WHERE id = ?1",
            params![id],
            map_clinic,
        )
        .optional()?;
    Ok(clinic)
}

pub fn list_clinics(conn: &Connection) -> Result<Vec<Clinic>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name, address FROM clinics ORDER BY id")?;
    let rows = stmt.query_map([], map_clinic)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
