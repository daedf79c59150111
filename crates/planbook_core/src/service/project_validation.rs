//! Owner-scoped project validation.
//!
//! # Responsibility
//! - Combine the presence rule with the per-owner uniqueness rule.
//! - Stay storage-agnostic: uniqueness is answered by a `ProjectNameLookup`.
//!
//! # Invariants
//! - The candidate is never mutated.
//! - Uniqueness is checked against the normalized name and excludes the
//!   candidate's own id, so re-saving an unchanged project is valid.
//! - This check is best-effort; the storage unique index stays authoritative
//!   and reports the same `DuplicateName` error.

use crate::model::project::Project;
use crate::model::validation::{ValidationErrorKind, ValidationErrors};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::project_repo::ProjectNameLookup;

/// Validates `candidate` against presence and owner-scoped uniqueness.
///
/// # Errors
/// - `RepoError::Validation` with `BlankName` on `name` when the name is blank.
/// - `RepoError::Validation` with `DuplicateName` on `name` when another
///   project of the same owner uses the name.
/// - Any error returned by `lookup` is propagated unchanged.
pub fn validate_project<L>(candidate: &Project, lookup: &L) -> RepoResult<()>
where
    L: ProjectNameLookup + ?Sized,
{
    let mut errors = ValidationErrors::new();

    match candidate.normalized_name() {
        None => errors.add("name", ValidationErrorKind::BlankName),
        Some(name) => {
            if lookup.name_taken(candidate.owner_id, name, Some(candidate.id))? {
                errors.add("name", ValidationErrorKind::DuplicateName);
            }
        }
    }

    errors.into_result().map_err(RepoError::Validation)
}

#[cfg(test)]
mod tests {
    use super::validate_project;
    use crate::model::project::{Project, ProjectId};
    use crate::model::user::UserId;
    use crate::model::validation::ValidationErrorKind;
    use crate::repo::error::{RepoError, RepoResult};
    use crate::repo::project_repo::ProjectNameLookup;
    use std::cell::Cell;
    use uuid::Uuid;

    /// In-memory lookup over `(owner, name, id)` triples.
    #[derive(Default)]
    struct ExistingNames {
        rows: Vec<(UserId, String, ProjectId)>,
        calls: Cell<usize>,
    }

    impl ExistingNames {
        fn with(mut self, project: &Project) -> Self {
            self.rows
                .push((project.owner_id, project.name.clone(), project.id));
            self
        }
    }

    impl ProjectNameLookup for ExistingNames {
        fn name_taken(
            &self,
            owner_id: UserId,
            name: &str,
            exclude: Option<ProjectId>,
        ) -> RepoResult<bool> {
            self.calls.set(self.calls.get() + 1);
            Ok(self
                .rows
                .iter()
                .any(|(owner, existing, id)| {
                    *owner == owner_id && existing == name && Some(*id) != exclude
                }))
        }
    }

    struct BrokenLookup;

    impl ProjectNameLookup for BrokenLookup {
        fn name_taken(&self, _: UserId, _: &str, _: Option<ProjectId>) -> RepoResult<bool> {
            Err(RepoError::InvalidData("lookup unavailable".to_string()))
        }
    }

    #[test]
    fn named_project_with_owner_is_valid() {
        let project = Project::new(Uuid::new_v4(), "Test Project");
        validate_project(&project, &ExistingNames::default()).unwrap();
    }

    #[test]
    fn blank_name_skips_uniqueness_lookup() {
        let lookup = ExistingNames::default();
        let project = Project::new(Uuid::new_v4(), "  ");

        let err = validate_project(&project, &lookup).unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert!(errors.contains("name", ValidationErrorKind::BlankName));
        assert_eq!(errors.len(), 1);
        assert_eq!(lookup.calls.get(), 0);
    }

    #[test]
    fn same_owner_same_name_is_duplicate() {
        let owner = Uuid::new_v4();
        let existing = Project::new(owner, "Test Project");
        let lookup = ExistingNames::default().with(&existing);

        let candidate = Project::new(owner, "Test Project");
        let err = validate_project(&candidate, &lookup).unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.messages_for("name"), vec!["has already been taken"]);
    }

    #[test]
    fn padded_duplicate_is_still_duplicate() {
        let owner = Uuid::new_v4();
        let lookup = ExistingNames::default().with(&Project::new(owner, "Test Project"));

        let candidate = Project::new(owner, "  Test Project ");
        let err = validate_project(&candidate, &lookup).unwrap_err();
        assert!(err
            .validation_errors()
            .unwrap()
            .contains("name", ValidationErrorKind::DuplicateName));
    }

    #[test]
    fn other_owner_may_reuse_name() {
        let lookup =
            ExistingNames::default().with(&Project::new(Uuid::new_v4(), "Test Project"));
        let candidate = Project::new(Uuid::new_v4(), "Test Project");
        validate_project(&candidate, &lookup).unwrap();
    }

    #[test]
    fn project_does_not_conflict_with_itself() {
        let existing = Project::new(Uuid::new_v4(), "Test Project");
        let lookup = ExistingNames::default().with(&existing);
        validate_project(&existing, &lookup).unwrap();
    }

    #[test]
    fn lookup_failure_propagates_as_infrastructure_error() {
        let project = Project::new(Uuid::new_v4(), "Test Project");
        let err = validate_project(&project, &BrokenLookup).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }
}
