//! User repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Emails are stored trimmed and lowercase; `users.email` is unique.
//! - A duplicate email surfaces as `DuplicateEmail` on `email`.

use crate::db::DbError;
use crate::model::user::{User, UserId};
use crate::model::validation::{ValidationErrorKind, ValidationErrors};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::{ensure_table_ready, parse_uuid};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for project owners.
pub trait UserRepository {
    /// Creates one user and returns its stable id.
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    /// Gets one user by id.
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Returns whether a user with `id` exists.
    fn user_exists(&self, id: UserId) -> RepoResult<bool>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "users", &["uuid", "display_name", "email"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        user.validate()?;
        let email = user.normalized_email().unwrap_or_default();

        self.conn
            .execute(
                "INSERT INTO users (uuid, display_name, email) VALUES (?1, ?2, ?3);",
                params![user.id.to_string(), user.display_name.trim(), email],
            )
            .map_err(|err| {
                let err = DbError::from(err);
                if err.is_unique_violation() {
                    RepoError::Validation(ValidationErrors::single(
                        "email",
                        ValidationErrorKind::DuplicateEmail,
                    ))
                } else {
                    RepoError::Db(err)
                }
            })?;

        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, display_name, email FROM users WHERE uuid = ?1;")?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn user_exists(&self, id: UserId) -> RepoResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM users WHERE uuid = ?1;",
                [id.to_string()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let uuid_text: String = row.get("uuid")?;
    Ok(User {
        id: parse_uuid(&uuid_text, "users.uuid")?,
        display_name: row.get("display_name")?,
        email: row.get("email")?,
    })
}
