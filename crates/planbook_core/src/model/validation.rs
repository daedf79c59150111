//! Field-level validation error reporting.
//!
//! # Responsibility
//! - Carry one or more field errors from any validation path.
//! - Provide stable user-facing messages for each error kind.
//!
//! # Invariants
//! - Pre-write validation and storage constraint translation produce the
//!   same `FieldError` for the same rule.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Message for required fields that are empty after trimming.
pub const BLANK_MESSAGE: &str = "can't be blank";
/// Message for values that collide with an existing record in their scope.
pub const TAKEN_MESSAGE: &str = "has already been taken";

/// Validation rule that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Project name is empty or whitespace-only.
    BlankName,
    /// Another project of the same owner already uses the name.
    DuplicateName,
    /// User display name is empty or whitespace-only.
    BlankDisplayName,
    /// User email is empty or whitespace-only.
    BlankEmail,
    /// Another user already uses the email.
    DuplicateEmail,
    /// Note message is empty or whitespace-only.
    BlankMessage,
}

impl ValidationErrorKind {
    /// Returns the user-facing message for this rule.
    pub fn message(self) -> &'static str {
        match self {
            Self::BlankName | Self::BlankDisplayName | Self::BlankEmail | Self::BlankMessage => {
                BLANK_MESSAGE
            }
            Self::DuplicateName | Self::DuplicateEmail => TAKEN_MESSAGE,
        }
    }
}

/// One failed rule attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: ValidationErrorKind,
}

impl FieldError {
    pub fn new(field: &'static str, kind: ValidationErrorKind) -> Self {
        Self { field, kind }
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

/// Collected validation failures for one candidate record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection holding a single error.
    pub fn single(field: &'static str, kind: ValidationErrorKind) -> Self {
        let mut errors = Self::new();
        errors.add(field, kind);
        errors
    }

    pub fn add(&mut self, field: &'static str, kind: ValidationErrorKind) {
        self.errors.push(FieldError::new(field, kind));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Returns all messages reported for `field`, in insertion order.
    pub fn messages_for(&self, field: &str) -> Vec<&'static str> {
        self.errors
            .iter()
            .filter(|error| error.field == field)
            .map(FieldError::message)
            .collect()
    }

    /// Returns whether `field` failed with `kind`.
    pub fn contains(&self, field: &str, kind: ValidationErrorKind) -> bool {
        self.errors
            .iter()
            .any(|error| error.field == field && error.kind == kind)
    }

    /// Converts the collection into `Err(self)` when non-empty.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (idx, error) in self.errors.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", error.field, error.message())?;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Returns the trimmed form of a required text value, or `None` when blank.
pub fn normalize_required(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_required, ValidationErrorKind, ValidationErrors};

    #[test]
    fn messages_follow_rule_kind() {
        assert_eq!(ValidationErrorKind::BlankName.message(), "can't be blank");
        assert_eq!(
            ValidationErrorKind::DuplicateName.message(),
            "has already been taken"
        );
    }

    #[test]
    fn display_joins_field_and_message() {
        let mut errors = ValidationErrors::single("name", ValidationErrorKind::BlankName);
        errors.add("email", ValidationErrorKind::DuplicateEmail);
        assert_eq!(
            errors.to_string(),
            "name can't be blank, email has already been taken"
        );
    }

    #[test]
    fn empty_collection_converts_to_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn normalize_required_trims_and_rejects_blank() {
        assert_eq!(normalize_required("  Alpha "), Some("Alpha"));
        assert_eq!(normalize_required(" \t\n"), None);
        assert_eq!(normalize_required(""), None);
    }
}
