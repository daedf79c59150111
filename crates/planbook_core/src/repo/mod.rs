//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Write paths run field presence checks before SQL mutations.
//! - Storage constraint violations surface as the same semantic errors the
//!   validation layer reports (`DuplicateName`, `UserNotFound`, ...), never as
//!   raw SQLite errors.

pub mod error;
pub mod note_repo;
pub mod project_repo;
mod schema;
pub mod user_repo;
