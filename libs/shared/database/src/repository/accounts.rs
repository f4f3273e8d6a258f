use rusqlite::{params, Connection, OptionalExtension, Row};

use shared_models::{Account, Role};

use super::enum_column;
use crate::error::DatabaseError;

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, role";

fn map_account(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: enum_column(row, 4)?,
    })
}

pub fn insert_account(
    conn: &Connection,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<Account, DatabaseError> {
    conn.execute(
        "INSERT INTO accounts (name, email, password_hash, role) VALUES (?1, ?2, ?3, ?4)",
        params![name, email, password_hash, role.as_str()],
    )?;

    Ok(Account {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        role,
    })
}

pub fn get_account(conn: &Connection, id: i64) -> Result<Option<Account>, DatabaseError> {
    let account = conn
        .query_row(
            &format!("SELECT {} FROM accounts WHERE id = ?1", ACCOUNT_COLUMNS),
            params![id],
            map_account,
        )
        .optional()?;
    Ok(account)
}

pub fn find_account_by_email(conn: &Connection, email: &str) -> Result<Option<Account>, DatabaseError> {
    let account = conn
        .query_row(
            &format!("SELECT {} FROM accounts WHERE email = ?1", ACCOUNT_COLUMNS),
            params![email],
            map_account,
        )
        .optional()?;
    Ok(account)
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM accounts ORDER BY id", ACCOUNT_COLUMNS))?;
    let rows = stmt.query_map([], map_account)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn count_accounts(conn: &Connection) -> Result<i64, DatabaseError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?)
}
