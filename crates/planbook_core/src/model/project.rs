//! Project domain model.
//!
//! # Responsibility
//! - Define the project record owned by exactly one user.
//! - Provide the presence rule and the lateness predicate.
//!
//! # Invariants
//! - `name` is non-blank after trimming; the trimmed form is the stored and
//!   compared form.
//! - `is_late` compares calendar dates only and never reads the ambient clock.
//!
//! # See also
//! - `service::project_validation` for the owner-scoped uniqueness rule.

use crate::model::user::UserId;
use crate::model::validation::{normalize_required, ValidationErrorKind, ValidationErrors};
use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a project.
pub type ProjectId = Uuid;

/// Project owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable ID, generated on creation.
    pub id: ProjectId,
    /// Owning user; scoping key for name uniqueness.
    pub owner_id: UserId,
    /// Display name, unique per owner.
    pub name: String,
    /// Free-form description, unconstrained.
    pub description: Option<String>,
    /// Calendar due date, serialized as `YYYY-MM-DD`.
    pub due_on: Option<NaiveDate>,
}

/// Owner-supplied attributes for a new project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub due_on: Option<NaiveDate>,
}

impl NewProject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Project {
    /// Creates a project with a generated ID and no optional attributes.
    pub fn new(owner_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            description: None,
            due_on: None,
        }
    }

    /// Creates a project for `owner_id` from owner-supplied attributes.
    pub fn from_new(owner_id: UserId, attrs: NewProject) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: attrs.name,
            description: attrs.description,
            due_on: attrs.due_on,
        }
    }

    /// Returns the trimmed name, or `None` when the name is blank.
    pub fn normalized_name(&self) -> Option<&str> {
        normalize_required(&self.name)
    }

    /// Checks the field rules that need no storage access.
    ///
    /// # Errors
    /// - `BlankName` on `name` when the name is empty after trimming.
    pub fn validate_presence(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.normalized_name().is_none() {
            errors.add("name", ValidationErrorKind::BlankName);
        }
        errors.into_result()
    }

    /// Returns whether the due date is strictly before `today`.
    ///
    /// A project without a due date is never late. A project due on `today`
    /// is on time.
    pub fn is_late(&self, today: NaiveDate) -> bool {
        self.due_on.is_some_and(|due_on| due_on < today)
    }

    /// Same as [`Project::is_late`], with `today` taken from the calendar date
    /// of `now` in its own time zone. Time of day is ignored.
    pub fn is_late_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.is_late(now.date_naive())
    }
}
