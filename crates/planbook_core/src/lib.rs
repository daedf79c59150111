//! Core domain logic for planbook.
//! This crate is the single source of truth for project invariants.

pub mod config;
pub mod db;
pub mod factory;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId};
pub use model::project::{NewProject, Project, ProjectId};
pub use model::user::{User, UserId};
pub use model::validation::{FieldError, ValidationErrorKind, ValidationErrors};
pub use repo::error::{RepoError, RepoResult};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::project_repo::{ProjectNameLookup, ProjectRepository, SqliteProjectRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use service::project_service::{ProjectService, ProjectServiceError};
pub use service::project_validation::validate_project;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
