//! Test-data factories for users and projects.
//!
//! # Responsibility
//! - Produce valid, persisted users and projects with sequenced names.
//! - Provide the named project variants used by fixtures: due yesterday,
//!   due today, due tomorrow, and with five notes attached.
//!
//! # Invariants
//! - Every created record passes the same validation as service writes.
//! - Name/email sequences are process-wide, so repeated calls never collide.
//! - Dates are computed from the caller-supplied `today`.

use crate::model::note::Note;
use crate::model::project::Project;
use crate::model::user::{User, UserId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::note_repo::{NoteRepository, SqliteNoteRepository};
use crate::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::service::project_validation::validate_project;
use chrono::{Days, NaiveDate};
use rusqlite::Connection;
use std::sync::atomic::{AtomicU64, Ordering};

/// Description given to every factory project.
pub const DEFAULT_DESCRIPTION: &str = "Sample project for testing purposes";
/// Days between `today` and the default due date.
pub const DEFAULT_DUE_IN_DAYS: u64 = 7;
/// Notes attached by [`ProjectFactory::with_notes`].
pub const NOTES_PER_PROJECT: usize = 5;

static USER_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PROJECT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static NOTE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next(sequence: &AtomicU64) -> u64 {
    sequence.fetch_add(1, Ordering::Relaxed)
}

/// Creates persisted users with sequenced names and emails.
pub struct UserFactory<'conn> {
    conn: &'conn Connection,
}

impl<'conn> UserFactory<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Builds an unsaved user.
    pub fn build(&self) -> User {
        let n = next(&USER_SEQUENCE);
        User::new(format!("Test User {n}"), format!("tester{n}@example.com"))
    }

    /// Creates and persists a user, returning the stored row.
    pub fn create(&self) -> RepoResult<User> {
        let user = self.build();
        let users = SqliteUserRepository::try_new(self.conn)?;
        let id = users.create_user(&user)?;
        users.get_user(id)?.ok_or(RepoError::UserNotFound(id))
    }
}

/// Creates persisted projects, auto-creating an owner when none is given.
pub struct ProjectFactory<'conn> {
    conn: &'conn Connection,
    today: NaiveDate,
    owner_id: Option<UserId>,
    name: Option<String>,
    description: Option<String>,
    due_on: Option<NaiveDate>,
    with_notes: bool,
}

impl<'conn> ProjectFactory<'conn> {
    /// Starts a default project: sequenced name, fixed description, due one
    /// week after `today`.
    pub fn new(conn: &'conn Connection, today: NaiveDate) -> Self {
        Self {
            conn,
            today,
            owner_id: None,
            name: None,
            description: Some(DEFAULT_DESCRIPTION.to_string()),
            due_on: today.checked_add_days(Days::new(DEFAULT_DUE_IN_DAYS)),
            with_notes: false,
        }
    }

    /// Uses an existing owner instead of creating one.
    pub fn owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn due_on(mut self, due_on: Option<NaiveDate>) -> Self {
        self.due_on = due_on;
        self
    }

    pub fn due_yesterday(self) -> Self {
        let due_on = self.today.pred_opt();
        self.due_on(due_on)
    }

    pub fn due_today(self) -> Self {
        let due_on = Some(self.today);
        self.due_on(due_on)
    }

    pub fn due_tomorrow(self) -> Self {
        let due_on = self.today.succ_opt();
        self.due_on(due_on)
    }

    /// Attaches [`NOTES_PER_PROJECT`] notes after the project is created.
    pub fn with_notes(mut self) -> Self {
        self.with_notes = true;
        self
    }

    /// Builds an unsaved project. Creates the owner when none was given.
    pub fn build(&self) -> RepoResult<Project> {
        let owner_id = match self.owner_id {
            Some(owner_id) => owner_id,
            None => UserFactory::new(self.conn).create()?.id,
        };
        let name = match &self.name {
            Some(name) => name.clone(),
            None => format!("Test Project {}", next(&PROJECT_SEQUENCE)),
        };

        let mut project = Project::new(owner_id, name);
        project.description = self.description.clone();
        project.due_on = self.due_on;
        Ok(project)
    }

    /// Validates and persists the project, then attaches notes if requested.
    /// Returns the project as stored, with its name normalized.
    pub fn create(&self) -> RepoResult<Project> {
        let project = self.build()?;
        let projects = SqliteProjectRepository::try_new(self.conn)?;
        validate_project(&project, &projects)?;
        let id = projects.create_project(&project)?;

        if self.with_notes {
            let notes = SqliteNoteRepository::try_new(self.conn)?;
            for _ in 0..NOTES_PER_PROJECT {
                let message = format!("Test note {}", next(&NOTE_SEQUENCE));
                notes.create_note(&Note::new(id, message))?;
            }
        }

        projects.get_project(id)?.ok_or(RepoError::ProjectNotFound(id))
    }
}
