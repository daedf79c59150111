//! Project note model.
//!
//! # Invariants
//! - A note belongs to exactly one project for its whole lifetime.
//! - `message` is non-blank after trimming.

use crate::model::project::ProjectId;
use crate::model::validation::{normalize_required, ValidationErrorKind, ValidationErrors};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a note.
pub type NoteId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub project_id: ProjectId,
    pub message: String,
    /// Creation timestamp in epoch milliseconds. Storage-managed; `0` until
    /// the note has been read back.
    pub created_at: i64,
}

impl Note {
    pub fn new(project_id: ProjectId, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            message: message.into(),
            created_at: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        if normalize_required(&self.message).is_none() {
            return Err(ValidationErrors::single(
                "message",
                ValidationErrorKind::BlankMessage,
            ));
        }
        Ok(())
    }
}
