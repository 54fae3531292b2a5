//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the two narrow storage contracts (state mirror, blob store).
//! - Isolate SQLite details from store semantics.
//!
//! # Invariants
//! - Implementations are constructed via schema-guarded `try_new` and
//!   refuse unmigrated connections.

use rusqlite::Connection;

pub mod blob_repo;
pub mod state_repo;

use state_repo::RepoResult;

pub(crate) fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn table_has_column(
    conn: &Connection,
    table: &str,
    column: &str,
) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
