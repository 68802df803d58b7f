//! Core persistence logic for student records.
//! This crate is the single source of truth for record invariants and storage.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::StoreConfig;
pub use db::{DbError, DbResult, DEFAULT_DB_PATH};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::student::{Student, StudentValidationError};
pub use repo::student_repo::{SqliteStudentStore, StoreError, StoreResult, StudentRepository};
pub use service::student_service::StudentService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
