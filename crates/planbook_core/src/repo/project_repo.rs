//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `projects` table.
//! - Answer "is this name already used by this owner?" for validation.
//!
//! # Invariants
//! - Names are written in trimmed form so the `(owner_uuid, name)` unique
//!   index and the validation lookup compare the same value.
//! - A unique index violation surfaces as `DuplicateName` on `name`.
//! - A missing owner surfaces as `UserNotFound`.
//! - Deleting a project with notes is refused with `ProjectHasNotes`.

use crate::db::DbError;
use crate::model::project::{Project, ProjectId};
use crate::model::user::UserId;
use crate::model::validation::{ValidationErrorKind, ValidationErrors};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::{ensure_table_ready, parse_uuid};
use rusqlite::{params, Connection, Row};

const PROJECT_SELECT_SQL: &str = "SELECT
    uuid,
    owner_uuid,
    name,
    description,
    due_on
FROM projects";

/// Lookup capability used by scoped name validation.
///
/// Implementations answer whether a project other than `exclude` already uses
/// `name` under `owner_id`. `name` is passed in normalized (trimmed) form.
pub trait ProjectNameLookup {
    fn name_taken(
        &self,
        owner_id: UserId,
        name: &str,
        exclude: Option<ProjectId>,
    ) -> RepoResult<bool>;
}

/// Repository interface for project CRUD operations.
pub trait ProjectRepository: ProjectNameLookup {
    /// Inserts a project and returns its stable id.
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    /// Replaces name, description and due date of an existing project.
    fn update_project(&self, project: &Project) -> RepoResult<()>;
    /// Gets one project by id.
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    /// Lists projects of one owner ordered by `name ASC, uuid ASC`.
    fn list_projects_for_owner(&self, owner_id: UserId) -> RepoResult<Vec<Project>>;
    /// Hard-deletes one project.
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "projects",
            &[
                "uuid",
                "owner_uuid",
                "name",
                "description",
                "due_on",
                "created_at",
                "updated_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl ProjectNameLookup for SqliteProjectRepository<'_> {
    fn name_taken(
        &self,
        owner_id: UserId,
        name: &str,
        exclude: Option<ProjectId>,
    ) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM projects
                WHERE owner_uuid = ?1
                  AND name = ?2
                  AND (?3 IS NULL OR uuid <> ?3)
            );",
            params![
                owner_id.to_string(),
                name,
                exclude.map(|id| id.to_string())
            ],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        project.validate_presence()?;

        self.conn
            .execute(
                "INSERT INTO projects (
                    uuid,
                    owner_uuid,
                    name,
                    description,
                    due_on
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    project.id.to_string(),
                    project.owner_id.to_string(),
                    project.normalized_name(),
                    project.description.as_deref(),
                    project.due_on,
                ],
            )
            .map_err(|err| map_write_error(err, project))?;

        Ok(project.id)
    }

    fn update_project(&self, project: &Project) -> RepoResult<()> {
        project.validate_presence()?;

        let changed = self
            .conn
            .execute(
                "UPDATE projects
                 SET
                    name = ?1,
                    description = ?2,
                    due_on = ?3,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?4;",
                params![
                    project.normalized_name(),
                    project.description.as_deref(),
                    project.due_on,
                    project.id.to_string(),
                ],
            )
            .map_err(|err| map_write_error(err, project))?;

        if changed == 0 {
            return Err(RepoError::ProjectNotFound(project.id));
        }

        Ok(())
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn list_projects_for_owner(&self, owner_id: UserId) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL}
             WHERE owner_uuid = ?1
             ORDER BY name ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([owner_id.to_string()])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let has_notes: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM notes WHERE project_uuid = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        if has_notes == 1 {
            return Err(RepoError::ProjectHasNotes(id));
        }

        // The notes foreign key still guards against a note inserted between
        // the check and the delete.
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE uuid = ?1;", [id.to_string()])
            .map_err(|err| {
                let err = DbError::from(err);
                if err.is_foreign_key_violation() {
                    RepoError::ProjectHasNotes(id)
                } else {
                    RepoError::Db(err)
                }
            })?;

        if changed == 0 {
            return Err(RepoError::ProjectNotFound(id));
        }

        Ok(())
    }
}

/// Translates constraint violations on project writes into domain errors.
fn map_write_error(err: rusqlite::Error, project: &Project) -> RepoError {
    let err = DbError::from(err);
    if err.is_unique_violation() {
        RepoError::Validation(ValidationErrors::single(
            "name",
            ValidationErrorKind::DuplicateName,
        ))
    } else if err.is_foreign_key_violation() {
        RepoError::UserNotFound(project.owner_id)
    } else {
        RepoError::Db(err)
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let uuid_text: String = row.get("uuid")?;
    let owner_text: String = row.get("owner_uuid")?;

    let project = Project {
        id: parse_uuid(&uuid_text, "projects.uuid")?,
        owner_id: parse_uuid(&owner_text, "projects.owner_uuid")?,
        name: row.get("name")?,
        description: row.get("description")?,
        due_on: row.get("due_on")?,
    };
    project
        .validate_presence()
        .map_err(|_| RepoError::InvalidData(format!("blank name in project `{uuid_text}`")))?;
    Ok(project)
}
