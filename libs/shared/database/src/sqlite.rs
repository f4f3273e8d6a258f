use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, info, warn};

use shared_config::AppConfig;

use crate::error::DatabaseError;

pub const MEMORY_DATABASE_URL: &str = ":memory:";

const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../migrations/001_initial.sql"))];

/// Shared handle to the relational store.
///
/// A single connection guarded by a mutex: every unit of work runs while
/// holding the lock, so transactions never interleave inside the process.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn from_config(config: &AppConfig) -> Result<Self, DatabaseError> {
        Self::open(&config.database_url)
    }

    /// Open the store at `url` (a file path or `:memory:`) and bring the schema up to date.
    pub fn open(url: &str) -> Result<Self, DatabaseError> {
        let conn = if url == MEMORY_DATABASE_URL {
            Connection::open_in_memory()?
        } else {
            Connection::open(Path::new(url))?
        };
        info!("Opened database at {}", url);
        Self::initialize(conn)
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self, DatabaseError> {
        configure_pragmas(&conn)?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking thread pool.
    pub async fn call<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Connection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<DatabaseError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            // A panicking closure drops its open transaction, which rolls back,
            // so the connection is still usable after poisoning.
            let mut guard = conn.lock().unwrap_or_else(|poisoned| {
                warn!("Database lock was poisoned, recovering connection");
                PoisonError::into_inner(poisoned)
            });
            f(&mut guard)
        })
        .await
        .map_err(|e| DatabaseError::TaskFailed(e.to_string()))?
    }
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    Ok(())
}

/// Run all pending migrations. Every statement is idempotent, so re-running is harmless.
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    for (version, sql) in MIGRATIONS {
        if *version > current_version {
            info!("Running migration v{}", version);
            conn.execute_batch(sql).map_err(|e| DatabaseError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })?;
        }
    }

    debug!("Schema at version {}", get_current_version(conn));
    Ok(())
}

/// Current schema version (0 if no schema exists yet).
pub fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, Option<i64>>(0)
    })
    .ok()
    .flatten()
    .unwrap_or(0)
}
