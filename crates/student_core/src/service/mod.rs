//! Core use-case services.
//!
//! # Responsibility
//! - Give callers a stable entry point that does not name a storage backend.

pub mod student_service;
