use chrono::NaiveDate;
use planbook_core::db::open_db_in_memory;
use planbook_core::factory::{ProjectFactory, UserFactory};
use planbook_core::{
    NewProject, Project, ProjectNameLookup, ProjectRepository, ProjectService,
    ProjectServiceError, RepoError, RepoResult, SqliteNoteRepository, SqliteProjectRepository,
    SqliteUserRepository, ValidationErrorKind,
};
use rusqlite::Connection;
use uuid::Uuid;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
}

/// Repository whose uniqueness lookup always answers "free", simulating a
/// concurrent writer that committed between the check and the insert.
struct StaleLookupRepository<'conn> {
    inner: SqliteProjectRepository<'conn>,
}

impl ProjectNameLookup for StaleLookupRepository<'_> {
    fn name_taken(&self, _: planbook_core::UserId, _: &str, _: Option<Uuid>) -> RepoResult<bool> {
        Ok(false)
    }
}

impl ProjectRepository for StaleLookupRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<Uuid> {
        self.inner.create_project(project)
    }

    fn update_project(&self, project: &Project) -> RepoResult<()> {
        self.inner.update_project(project)
    }

    fn get_project(&self, id: Uuid) -> RepoResult<Option<Project>> {
        self.inner.get_project(id)
    }

    fn list_projects_for_owner(&self, owner_id: planbook_core::UserId) -> RepoResult<Vec<Project>> {
        self.inner.list_projects_for_owner(owner_id)
    }

    fn delete_project(&self, id: Uuid) -> RepoResult<()> {
        self.inner.delete_project(id)
    }
}

fn service(
    conn: &Connection,
) -> ProjectService<SqliteProjectRepository<'_>, SqliteUserRepository<'_>, SqliteNoteRepository<'_>>
{
    ProjectService::new(
        SqliteProjectRepository::try_new(conn).unwrap(),
        SqliteUserRepository::try_new(conn).unwrap(),
        SqliteNoteRepository::try_new(conn).unwrap(),
    )
}

#[test]
fn create_and_get_roundtrip_stores_trimmed_name() {
    let conn = open_db_in_memory().unwrap();
    let user = UserFactory::new(&conn).create().unwrap();

    let created = service(&conn)
        .create_for_owner(
            user.id,
            NewProject {
                name: "  Launch Plan ".to_string(),
                description: Some("Q3 launch".to_string()),
                due_on: Some(today()),
            },
        )
        .unwrap();

    assert_eq!(created.name, "Launch Plan");
    assert_eq!(created.owner_id, user.id);
    assert_eq!(created.description.as_deref(), Some("Q3 launch"));
    assert_eq!(created.due_on, Some(today()));
}

#[test]
fn storage_index_rejects_duplicate_when_validation_is_bypassed() {
    let conn = open_db_in_memory().unwrap();
    let user = UserFactory::new(&conn).create().unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    repo.create_project(&Project::new(user.id, "Test Project"))
        .unwrap();
    let err = repo
        .create_project(&Project::new(user.id, "Test Project"))
        .unwrap_err();

    match err {
        RepoError::Validation(errors) => {
            assert!(errors.contains("name", ValidationErrorKind::DuplicateName));
            assert_eq!(errors.messages_for("name"), vec!["has already been taken"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn racing_writer_converges_to_duplicate_name() {
    let conn = open_db_in_memory().unwrap();
    let user = UserFactory::new(&conn).create().unwrap();

    let service = ProjectService::new(
        StaleLookupRepository {
            inner: SqliteProjectRepository::try_new(&conn).unwrap(),
        },
        SqliteUserRepository::try_new(&conn).unwrap(),
        SqliteNoteRepository::try_new(&conn).unwrap(),
    );

    service
        .create_for_owner(user.id, NewProject::named("Test Project"))
        .unwrap();
    let err = service
        .create_for_owner(user.id, NewProject::named("Test Project"))
        .unwrap_err();

    assert!(err.is_duplicate_name());
    assert_eq!(
        service.list_projects_for_owner(user.id).unwrap().len(),
        1
    );
}

#[test]
fn padded_duplicate_hits_storage_index() {
    let conn = open_db_in_memory().unwrap();
    let user = UserFactory::new(&conn).create().unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    repo.create_project(&Project::new(user.id, "Test Project"))
        .unwrap();
    let err = repo
        .create_project(&Project::new(user.id, " Test Project  "))
        .unwrap_err();
    assert!(err
        .validation_errors()
        .is_some_and(|errors| errors.contains("name", ValidationErrorKind::DuplicateName)));
}

#[test]
fn update_without_rename_does_not_conflict_with_itself() {
    let conn = open_db_in_memory().unwrap();
    let mut project = ProjectFactory::new(&conn, today()).create().unwrap();
    let service = service(&conn);

    project.description = Some("Revised".to_string());
    let updated = service.update_project(&project).unwrap();
    assert_eq!(updated.name, project.name);
    assert_eq!(updated.description.as_deref(), Some("Revised"));
}

#[test]
fn rename_onto_sibling_name_is_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let owner = UserFactory::new(&conn).create().unwrap();
    ProjectFactory::new(&conn, today())
        .owner(owner.id)
        .name("Alpha")
        .create()
        .unwrap();
    let mut beta = ProjectFactory::new(&conn, today())
        .owner(owner.id)
        .name("Beta")
        .create()
        .unwrap();

    beta.name = "Alpha".to_string();
    let err = service(&conn).update_project(&beta).unwrap_err();
    assert!(err.is_duplicate_name());
}

#[test]
fn update_keeps_persisted_owner() {
    let conn = open_db_in_memory().unwrap();
    let mut project = ProjectFactory::new(&conn, today()).create().unwrap();
    let original_owner = project.owner_id;
    let intruder = UserFactory::new(&conn).create().unwrap();

    project.owner_id = intruder.id;
    let updated = service(&conn).update_project(&project).unwrap();
    assert_eq!(updated.owner_id, original_owner);
}

#[test]
fn update_missing_project_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let user = UserFactory::new(&conn).create().unwrap();
    let ghost = Project::new(user.id, "Ghost");

    let err = service(&conn).update_project(&ghost).unwrap_err();
    assert!(matches!(err, ProjectServiceError::ProjectNotFound(id) if id == ghost.id));
}

#[test]
fn list_for_owner_is_scoped_and_sorted_by_name() {
    let conn = open_db_in_memory().unwrap();
    let owner = UserFactory::new(&conn).create().unwrap();
    for name in ["Gamma", "Alpha", "Beta"] {
        ProjectFactory::new(&conn, today())
            .owner(owner.id)
            .name(name)
            .create()
            .unwrap();
    }
    ProjectFactory::new(&conn, today())
        .name("Alpha")
        .create()
        .unwrap();

    let names: Vec<String> = service(&conn)
        .list_projects_for_owner(owner.id)
        .unwrap()
        .into_iter()
        .map(|project| project.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
}

#[test]
fn late_projects_for_owner_uses_supplied_today() {
    let conn = open_db_in_memory().unwrap();
    let owner = UserFactory::new(&conn).create().unwrap();
    let late = ProjectFactory::new(&conn, today())
        .owner(owner.id)
        .due_yesterday()
        .create()
        .unwrap();
    ProjectFactory::new(&conn, today())
        .owner(owner.id)
        .due_today()
        .create()
        .unwrap();
    ProjectFactory::new(&conn, today())
        .owner(owner.id)
        .due_on(None)
        .create()
        .unwrap();

    let service = service(&conn);
    let found = service.late_projects_for_owner(owner.id, today()).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, late.id);

    let later = today().succ_opt().unwrap();
    assert_eq!(
        service.late_projects_for_owner(owner.id, later).unwrap().len(),
        2
    );
}

#[test]
fn delete_removes_project_without_notes() {
    let conn = open_db_in_memory().unwrap();
    let project = ProjectFactory::new(&conn, today()).create().unwrap();
    let service = service(&conn);

    service.delete_project(project.id).unwrap();
    assert!(service.get_project(project.id).unwrap().is_none());

    let err = service.delete_project(project.id).unwrap_err();
    assert!(matches!(err, ProjectServiceError::ProjectNotFound(_)));
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteProjectRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}
