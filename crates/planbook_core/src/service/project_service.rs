//! Project use-case service.
//!
//! # Responsibility
//! - Create projects through their owner and apply owner edits.
//! - Run owner-scoped validation before every write.
//! - Expose the project -> notes association and lateness queries.
//!
//! # Invariants
//! - Pre-write validation and storage unique-index conflicts both surface as
//!   `ProjectServiceError::Invalid` carrying `DuplicateName` on `name`.
//! - The owner of a project never changes after creation.
//! - "today" is always supplied by the caller.

use crate::model::note::Note;
use crate::model::project::{NewProject, Project, ProjectId};
use crate::model::user::UserId;
use crate::model::validation::{ValidationErrorKind, ValidationErrors};
use crate::repo::error::RepoError;
use crate::repo::note_repo::NoteRepository;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::user_repo::UserRepository;
use crate::service::project_validation::validate_project;
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for project use-cases.
#[derive(Debug)]
pub enum ProjectServiceError {
    /// One or more field rules failed.
    Invalid(ValidationErrors),
    /// Owning user does not exist.
    OwnerNotFound(UserId),
    /// Target project does not exist.
    ProjectNotFound(ProjectId),
    /// Project still has notes and cannot be deleted.
    ProjectHasNotes(ProjectId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl ProjectServiceError {
    /// Returns the validation errors when this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    /// Returns whether this failure is a per-owner name conflict.
    pub fn is_duplicate_name(&self) -> bool {
        self.validation_errors()
            .is_some_and(|errors| errors.contains("name", ValidationErrorKind::DuplicateName))
    }
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => write!(f, "invalid project: {errors}"),
            Self::OwnerNotFound(id) => write!(f, "project owner not found: {id}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::ProjectHasNotes(id) => write!(f, "project still has notes: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent project state: {details}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ProjectServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(errors) => Self::Invalid(errors),
            RepoError::UserNotFound(id) => Self::OwnerNotFound(id),
            RepoError::ProjectNotFound(id) => Self::ProjectNotFound(id),
            RepoError::ProjectHasNotes(id) => Self::ProjectHasNotes(id),
            other => Self::Repo(other),
        }
    }
}

/// Project service facade over repository implementations.
pub struct ProjectService<P, U, N>
where
    P: ProjectRepository,
    U: UserRepository,
    N: NoteRepository,
{
    projects: P,
    users: U,
    notes: N,
}

impl<P, U, N> ProjectService<P, U, N>
where
    P: ProjectRepository,
    U: UserRepository,
    N: NoteRepository,
{
    /// Creates a service using the provided repository implementations.
    pub fn new(projects: P, users: U, notes: N) -> Self {
        Self {
            projects,
            users,
            notes,
        }
    }

    /// Validates a candidate without writing it.
    pub fn validate(&self, candidate: &Project) -> Result<(), ProjectServiceError> {
        validate_project(candidate, &self.projects).map_err(Into::into)
    }

    /// Creates one project owned by `owner_id`.
    ///
    /// # Errors
    /// - `OwnerNotFound` when the owner does not exist.
    /// - `Invalid` with `BlankName` or `DuplicateName` on `name`.
    pub fn create_for_owner(
        &self,
        owner_id: UserId,
        attrs: NewProject,
    ) -> Result<Project, ProjectServiceError> {
        if !self.users.user_exists(owner_id)? {
            return Err(ProjectServiceError::OwnerNotFound(owner_id));
        }

        let project = Project::from_new(owner_id, attrs);
        self.validate(&project)?;

        let project_id = self
            .projects
            .create_project(&project)
            .map_err(|err| log_write_conflict("project_create", project.id, err))?;
        info!("event=project_create module=service status=ok project_id={project_id} owner_id={owner_id}");

        self.projects
            .get_project(project_id)?
            .ok_or(ProjectServiceError::InconsistentState(
                "created project not found in read-back",
            ))
    }

    /// Applies an owner edit to name, description and due date.
    ///
    /// The persisted owner is authoritative; `project.owner_id` is ignored.
    pub fn update_project(&self, project: &Project) -> Result<Project, ProjectServiceError> {
        let existing = self
            .projects
            .get_project(project.id)?
            .ok_or(ProjectServiceError::ProjectNotFound(project.id))?;

        let candidate = Project {
            owner_id: existing.owner_id,
            ..project.clone()
        };
        self.validate(&candidate)?;

        self.projects
            .update_project(&candidate)
            .map_err(|err| log_write_conflict("project_update", candidate.id, err))?;

        self.projects
            .get_project(candidate.id)?
            .ok_or(ProjectServiceError::InconsistentState(
                "updated project not found in read-back",
            ))
    }

    /// Gets one project by stable ID.
    pub fn get_project(&self, id: ProjectId) -> Result<Option<Project>, ProjectServiceError> {
        self.projects.get_project(id).map_err(Into::into)
    }

    /// Lists projects of one owner ordered by name.
    pub fn list_projects_for_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Vec<Project>, ProjectServiceError> {
        self.projects
            .list_projects_for_owner(owner_id)
            .map_err(Into::into)
    }

    /// Lists projects of one owner that are late as of `today`.
    pub fn late_projects_for_owner(
        &self,
        owner_id: UserId,
        today: NaiveDate,
    ) -> Result<Vec<Project>, ProjectServiceError> {
        let mut projects = self.list_projects_for_owner(owner_id)?;
        projects.retain(|project| project.is_late(today));
        Ok(projects)
    }

    /// Deletes one project. Notes are never removed implicitly.
    ///
    /// # Errors
    /// - `ProjectHasNotes` when notes still reference the project.
    pub fn delete_project(&self, id: ProjectId) -> Result<(), ProjectServiceError> {
        self.projects.delete_project(id)?;
        info!("event=project_delete module=service status=ok project_id={id}");
        Ok(())
    }

    /// Attaches one note to an existing project.
    pub fn add_note(
        &self,
        project_id: ProjectId,
        message: impl Into<String>,
    ) -> Result<Note, ProjectServiceError> {
        let note = Note::new(project_id, message);
        let note_id = self.notes.create_note(&note)?;
        self.notes
            .get_note(note_id)?
            .ok_or(ProjectServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Returns all notes of a project in insertion order.
    pub fn notes(&self, project_id: ProjectId) -> Result<Vec<Note>, ProjectServiceError> {
        self.ensure_project_exists(project_id)?;
        self.notes
            .list_notes_for_project(project_id)
            .map_err(Into::into)
    }

    /// Returns how many notes a project has.
    pub fn note_count(&self, project_id: ProjectId) -> Result<u64, ProjectServiceError> {
        self.ensure_project_exists(project_id)?;
        self.notes
            .count_notes_for_project(project_id)
            .map_err(Into::into)
    }

    fn ensure_project_exists(&self, project_id: ProjectId) -> Result<(), ProjectServiceError> {
        match self.projects.get_project(project_id)? {
            Some(_) => Ok(()),
            None => Err(ProjectServiceError::ProjectNotFound(project_id)),
        }
    }
}

/// Logs a storage-level name conflict that slipped past pre-write validation.
fn log_write_conflict(
    event: &'static str,
    project_id: ProjectId,
    err: RepoError,
) -> ProjectServiceError {
    let err = ProjectServiceError::from(err);
    if err.is_duplicate_name() {
        warn!(
            "event={event} module=service status=conflict project_id={project_id} error_code=duplicate_name"
        );
    }
    err
}
