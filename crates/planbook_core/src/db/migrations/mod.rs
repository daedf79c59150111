//! Ordered schema steps for the planbook database.
//!
//! Each step is a SQL script tagged with the schema version it produces.
//! The database records the version it has reached in `PRAGMA user_version`,
//! and opening a connection runs every step above that version inside one
//! transaction. Step versions start at 1 and increase by one.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Scripts in the order they are applied. Position `i` produces version `i + 1`.
const SCHEMA_STEPS: [&str; 3] = [
    include_str!("0001_users.sql"),
    include_str!("0002_projects.sql"),
    include_str!("0003_notes.sql"),
];

/// Schema version produced by the newest step this build ships.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.len() as u32
}

/// Reads the schema version stored in the database header.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings the schema up to [`latest_version`].
///
/// Fails with [`DbError::UnsupportedSchemaVersion`] when the database was
/// written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = current_version(conn)?;
    let to = latest_version();
    if from > to {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        });
    }

    let pending = (from + 1..=to).zip(SCHEMA_STEPS.iter().skip(from as usize));
    let mut applied = 0;
    let tx = conn.transaction()?;
    for (version, script) in pending {
        tx.execute_batch(script)?;
        tx.pragma_update(None, "user_version", version)?;
        applied += 1;
    }
    tx.commit()?;

    if applied > 0 {
        info!("event=db_migrate module=db status=ok from_version={from} to_version={to} steps={applied}");
    }
    Ok(())
}
