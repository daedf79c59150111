//! User domain model.
//!
//! Users are the owning aggregate root for projects. Only the attributes
//! needed to identify an owner are modeled here.

use crate::model::validation::{normalize_required, ValidationErrorKind, ValidationErrors};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a user.
pub type UserId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    /// Login email, unique across users and stored lowercase.
    pub email: String,
}

impl User {
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            email: email.into(),
        }
    }

    /// Returns the trimmed, lowercased email, or `None` when blank.
    pub fn normalized_email(&self) -> Option<String> {
        normalize_required(&self.email).map(str::to_lowercase)
    }

    /// Checks presence of display name and email.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if normalize_required(&self.display_name).is_none() {
            errors.add("display_name", ValidationErrorKind::BlankDisplayName);
        }
        if self.normalized_email().is_none() {
            errors.add("email", ValidationErrorKind::BlankEmail);
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::User;
    use crate::model::validation::ValidationErrorKind;

    #[test]
    fn email_is_normalized_to_lowercase() {
        let user = User::new("Aki", "  Aki@Example.COM ");
        assert_eq!(user.normalized_email().as_deref(), Some("aki@example.com"));
    }

    #[test]
    fn blank_fields_are_reported_together() {
        let errors = User::new(" ", "").validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("display_name", ValidationErrorKind::BlankDisplayName));
        assert!(errors.contains("email", ValidationErrorKind::BlankEmail));
    }
}
