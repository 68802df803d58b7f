//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the student data access contract.
//! - Isolate SQLite query details from service and caller code.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`DuplicateKey`, `NotFound`) in
//!   addition to storage transport errors.
//! - Absence on `get` is a normal outcome, not an error.

pub mod student_repo;
