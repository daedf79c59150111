//! Domain model for users, projects and project notes.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own field-level rules that need no storage access (presence, lateness).
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - A project has exactly one owner; a note has exactly one project.
//! - Rules needing storage (scoped uniqueness) live in `service`.

pub mod note;
pub mod project;
pub mod user;
pub mod validation;
