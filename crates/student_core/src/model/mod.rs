//! Domain model for student records.
//!
//! # Responsibility
//! - Define the canonical record shape used by persistence and callers.
//! - Own field-level validation rules.
//!
//! # Invariants
//! - A `Student` held in memory always satisfies every field rule.
//! - Uniqueness of `id` is enforced by the store, not the model.

pub mod student;
