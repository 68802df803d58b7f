//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Every migration script is itself idempotent (`IF NOT EXISTS`).
//! - An unversioned `students` table is adopted only after its columns
//!   match the canonical schema; the legacy `student_id` key column is
//!   renamed to `id`, anything else is refused before the version is set.

use crate::db::{DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;

const LEGACY_KEY_COLUMN: &str = "student_id";
const STUDENT_COLUMNS: &[&str] = &["id", "first_name", "last_name", "age", "gpa"];

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_students.sql"),
}];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
///
/// Returns `Ok(())` without touching the schema when it is already current.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    if current_version == 0 {
        adopt_unversioned_students_table(&tx)?;
    }
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        current_version, latest
    );
    Ok(())
}

fn adopt_unversioned_students_table(conn: &Connection) -> DbResult<()> {
    let columns = table_columns(conn, "students")?;
    if columns.is_empty() {
        return Ok(());
    }

    let has = |name: &str| columns.iter().any(|column| column == name);
    if !has("id") && has(LEGACY_KEY_COLUMN) {
        conn.execute_batch(&format!(
            "ALTER TABLE students RENAME COLUMN {LEGACY_KEY_COLUMN} TO id;"
        ))?;
        info!("event=db_adopt_legacy module=db status=ok renamed_column={LEGACY_KEY_COLUMN}");
        return adopt_unversioned_students_table(conn);
    }

    if let Some(missing) = STUDENT_COLUMNS.iter().find(|&&name| !has(name)) {
        warn!("event=db_adopt_legacy module=db status=error missing_column={missing}");
        return Err(DbError::IncompatibleSchema {
            table: "students",
            missing_column: (*missing).to_string(),
        });
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

pub(crate) fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
