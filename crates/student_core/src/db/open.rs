//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Prepare the database directory and open file or in-memory connections.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before a database is handed to the store.
//!
//! # Invariants
//! - `open_db` returns connections with migrations fully applied.
//! - `connect` never creates a database file; it only reopens one that
//!   `open_db` has already bootstrapped.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

/// Creates the parent directory, opens the database file and applies all
/// pending migrations.
///
/// Safe to call on every startup: an up-to-date schema is left untouched.
///
/// # Side effects
/// - Creates missing parent directories of `path`.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>, busy_timeout: Duration) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let result = ensure_parent_dir(path)
        .and_then(|()| Connection::open(path).map_err(DbError::from))
        .and_then(|mut conn| {
            bootstrap_connection(&mut conn, busy_timeout)?;
            Ok(conn)
        });
    log_open_outcome("file", started_at, &result);
    result
}

/// Opens an in-memory database and applies all pending migrations.
///
/// The database lives only as long as the returned connection.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let result = Connection::open_in_memory()
        .map_err(DbError::from)
        .and_then(|mut conn| {
            bootstrap_connection(&mut conn, Duration::ZERO)?;
            Ok(conn)
        });
    log_open_outcome("memory", started_at, &result);
    result
}

/// Opens a short-lived connection to an existing, bootstrapped database.
///
/// Fails instead of creating a fresh empty file when `path` is missing.
pub fn connect(path: impl AsRef<Path>, busy_timeout: Duration) -> DbResult<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.busy_timeout(busy_timeout)?;
    Ok(conn)
}

fn ensure_parent_dir(path: &Path) -> DbResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| DbError::Io {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn bootstrap_connection(conn: &mut Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.busy_timeout(busy_timeout)?;
    apply_migrations(conn)?;
    Ok(())
}

fn log_open_outcome(mode: &str, started_at: Instant, result: &DbResult<Connection>) {
    match result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={} duration_ms={}",
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={} error_code={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            open_error_code(err),
            err
        ),
    }
}

fn open_error_code(err: &DbError) -> &'static str {
    match err {
        DbError::Io { .. } => "db_dir_failed",
        DbError::UnsupportedSchemaVersion { .. } => "db_schema_too_new",
        DbError::IncompatibleSchema { .. } => "db_schema_incompatible",
        DbError::Sqlite(_) | DbError::InvalidData(_) => "db_bootstrap_failed",
    }
}
