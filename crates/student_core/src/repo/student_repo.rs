//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the canonical `students` table.
//! - Translate SQLite failures into typed domain errors.
//!
//! # Invariants
//! - Every statement binds its values; no SQL is built from record data.
//! - Every operation opens its own connection and drops it before returning.
//! - Duplicate keys are classified from SQLite result codes, not message text.
//! - Read paths reject rows that violate record invariants instead of
//!   masking them.

use crate::config::StoreConfig;
use crate::db::{connect, open_db, DbError};
use crate::model::student::Student;
use log::{debug, info, warn};
use rusqlite::{ffi, params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    age,
    gpa
FROM students";

pub type StoreResult<T> = Result<T, StoreError>;

/// Domain error returned by every store operation.
#[derive(Debug)]
pub enum StoreError {
    /// `create` hit an id that is already persisted.
    DuplicateKey(String),
    /// `update`/`delete` targeted an id with no row.
    NotFound(String),
    /// Any other backend failure, with its cause preserved.
    Storage(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(id) => write!(f, "student already exists: {id}"),
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DuplicateKey(_) | Self::NotFound(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

/// CRUD contract shared by every student storage backend.
pub trait StudentRepository {
    /// Inserts a new record. Fails with `DuplicateKey` when the id exists.
    fn create(&self, student: &Student) -> StoreResult<()>;
    /// Overwrites every non-key field. Fails with `NotFound` when no row matches.
    fn update(&self, student: &Student) -> StoreResult<()>;
    /// Removes the record. Fails with `NotFound` when no row matches.
    fn delete(&self, id: &str) -> StoreResult<()>;
    /// Returns `Ok(None)` when no row matches.
    fn get(&self, id: &str) -> StoreResult<Option<Student>>;
    /// Returns every record ordered by id ascending.
    fn list(&self) -> StoreResult<Vec<Student>>;
}

impl<R: StudentRepository + ?Sized> StudentRepository for &R {
    fn create(&self, student: &Student) -> StoreResult<()> {
        (**self).create(student)
    }

    fn update(&self, student: &Student) -> StoreResult<()> {
        (**self).update(student)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        (**self).delete(id)
    }

    fn get(&self, id: &str) -> StoreResult<Option<Student>> {
        (**self).get(id)
    }

    fn list(&self) -> StoreResult<Vec<Student>> {
        (**self).list()
    }
}

/// SQLite-backed student store.
///
/// Holds only configuration; connections are opened per operation.
#[derive(Debug, Clone)]
pub struct SqliteStudentStore {
    config: StoreConfig,
}

impl SqliteStudentStore {
    /// Bootstraps the database at the default relative location.
    pub fn open_default() -> StoreResult<Self> {
        Self::open_with_config(StoreConfig::default())
    }

    /// Bootstraps the database at `path` with default connection settings.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_config(StoreConfig::default().with_db_path(path))
    }

    /// Creates the directory, verifies connectivity and applies the schema.
    ///
    /// A relative `db_path` is resolved against the working directory once,
    /// here; the handle keeps targeting that file if the directory changes.
    /// Idempotent: reopening an existing database keeps its rows.
    pub fn open_with_config(mut config: StoreConfig) -> StoreResult<Self> {
        config.db_path = resolve_db_path(&config.db_path)?;
        let conn = open_db(&config.db_path, config.busy_timeout)?;
        drop(conn);
        info!("event=store_init module=repo status=ok");
        Ok(Self { config })
    }

    pub fn path(&self) -> &Path {
        &self.config.db_path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Opens a connection and touches the `students` table.
    pub fn check_connection(&self) -> StoreResult<()> {
        let conn = self.connection()?;
        conn.query_row("SELECT COUNT(*) FROM students;", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    fn connection(&self) -> StoreResult<Connection> {
        connect(&self.config.db_path, self.config.busy_timeout).map_err(|err| {
            warn!("event=db_connect module=repo status=error error={}", err);
            StoreError::from(err)
        })
    }
}

impl StudentRepository for SqliteStudentStore {
    fn create(&self, student: &Student) -> StoreResult<()> {
        let conn = self.connection()?;
        let result = conn.execute(
            "INSERT INTO students (
                id,
                first_name,
                last_name,
                age,
                gpa
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                student.id(),
                student.first_name(),
                student.last_name(),
                student.age(),
                student.gpa(),
            ],
        );

        match result {
            Ok(_) => {
                debug!(
                    "event=student_create module=repo status=ok id={}",
                    student.id()
                );
                Ok(())
            }
            Err(err) if is_duplicate_key(&err) => {
                debug!(
                    "event=student_create module=repo status=duplicate id={}",
                    student.id()
                );
                Err(StoreError::DuplicateKey(student.id().to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update(&self, student: &Student) -> StoreResult<()> {
        let conn = self.connection()?;
        let changed = conn.execute(
            "UPDATE students
             SET
                first_name = ?1,
                last_name = ?2,
                age = ?3,
                gpa = ?4
             WHERE id = ?5;",
            params![
                student.first_name(),
                student.last_name(),
                student.age(),
                student.gpa(),
                student.id(),
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(student.id().to_string()));
        }

        debug!(
            "event=student_update module=repo status=ok id={}",
            student.id()
        );
        Ok(())
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let conn = self.connection()?;
        let changed = conn.execute("DELETE FROM students WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        debug!("event=student_delete module=repo status=ok id={}", id);
        Ok(())
    }

    fn get(&self, id: &str) -> StoreResult<Option<Student>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"))?;

        let row = stmt.query_row([id], read_student_columns).optional()?;
        row.map(into_student).transpose()
    }

    fn list(&self) -> StoreResult<Vec<Student>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!("{STUDENT_SELECT_SQL} ORDER BY id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(into_student(read_student_columns(row)?)?);
        }

        Ok(students)
    }
}

fn resolve_db_path(path: &Path) -> StoreResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| DbError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(path))
}

type StudentColumns = (String, String, String, i32, f64);

fn read_student_columns(row: &Row<'_>) -> rusqlite::Result<StudentColumns> {
    Ok((
        row.get("id")?,
        row.get("first_name")?,
        row.get("last_name")?,
        row.get("age")?,
        row.get("gpa")?,
    ))
}

fn into_student(columns: StudentColumns) -> StoreResult<Student> {
    let (id, first_name, last_name, age, gpa) = columns;
    Student::new(id, first_name, last_name, age, gpa)
        .map_err(|err| StoreError::Storage(DbError::InvalidData(err.to_string())))
}

fn is_duplicate_key(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && matches!(
                    failure.extended_code,
                    ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE
                )
        }
        _ => false,
    }
}
