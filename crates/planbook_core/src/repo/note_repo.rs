//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist notes attached to projects.
//! - Expose the project -> notes association in insertion order.
//!
//! # Invariants
//! - Note listing order is `seq ASC`, where `seq` grows with every insert.
//! - A note cannot be created for a missing project.

use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use crate::model::project::ProjectId;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::{ensure_table_ready, parse_uuid};
use rusqlite::{params, Connection, Row};

const NOTE_SELECT_SQL: &str = "SELECT uuid, project_uuid, message, created_at FROM notes";

/// Repository interface for project notes.
pub trait NoteRepository {
    /// Creates one note and returns its stable id.
    fn create_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists all notes of one project in insertion order.
    fn list_notes_for_project(&self, project_id: ProjectId) -> RepoResult<Vec<Note>>;
    /// Counts notes of one project.
    fn count_notes_for_project(&self, project_id: ProjectId) -> RepoResult<u64>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "notes",
            &["seq", "uuid", "project_uuid", "message", "created_at"],
        )?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &Note) -> RepoResult<NoteId> {
        note.validate()?;

        self.conn
            .execute(
                "INSERT INTO notes (uuid, project_uuid, message) VALUES (?1, ?2, ?3);",
                params![
                    note.id.to_string(),
                    note.project_id.to_string(),
                    note.message.as_str()
                ],
            )
            .map_err(|err| {
                let err = DbError::from(err);
                if err.is_foreign_key_violation() {
                    RepoError::ProjectNotFound(note.project_id)
                } else {
                    RepoError::Db(err)
                }
            })?;

        Ok(note.id)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn list_notes_for_project(&self, project_id: ProjectId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE project_uuid = ?1
             ORDER BY seq ASC;"
        ))?;
        let mut rows = stmt.query([project_id.to_string()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn count_notes_for_project(&self, project_id: ProjectId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notes WHERE project_uuid = ?1;",
            [project_id.to_string()],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative note count `{count}`")))
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let project_text: String = row.get("project_uuid")?;
    Ok(Note {
        id: parse_uuid(&uuid_text, "notes.uuid")?,
        project_id: parse_uuid(&project_text, "notes.project_uuid")?,
        message: row.get("message")?,
        created_at: row.get("created_at")?,
    })
}
