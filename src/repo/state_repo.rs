//! Key-value state mirror contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist whole-piece JSON blobs under the fixed logical keys.
//! - Provide a transactional multi-put for cascade writes.
//!
//! # Invariants
//! - One row per key in `app_state`; a put replaces the whole value.
//! - `put_many` is all-or-nothing.
//! - JSON encoding/decoding belongs to the store's mirror layer, not
//!   here.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::repo::{table_exists, table_has_column};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-layer error for mirror and blob operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Logical keys of the mirrored state pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKey {
    Projects,
    Modules,
    Bugs,
    SelectedProject,
    SelectedModule,
}

impl StateKey {
    pub const ALL: [StateKey; 5] = [
        StateKey::Projects,
        StateKey::Modules,
        StateKey::Bugs,
        StateKey::SelectedProject,
        StateKey::SelectedModule,
    ];

    /// Fixed string name of this key in the side-store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Modules => "modules",
            Self::Bugs => "bugs",
            Self::SelectedProject => "selected-project",
            Self::SelectedModule => "selected-module",
        }
    }
}

impl Display for StateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable key-value side-store for the mirrored state pieces.
pub trait StateRepository {
    /// Reads the blob stored under `key`, if any.
    fn get(&self, key: StateKey) -> RepoResult<Option<String>>;
    /// Replaces the blob stored under `key`.
    fn put(&self, key: StateKey, value: &str) -> RepoResult<()>;
    /// Replaces several blobs in a single transaction.
    fn put_many(&self, entries: &[(StateKey, String)]) -> RepoResult<()>;
}

/// SQLite-backed state mirror over the `app_state` table.
pub struct SqliteStateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStateRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_state_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

const PUT_SQL: &str = "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2);";

impl StateRepository for SqliteStateRepository<'_> {
    fn get(&self, key: StateKey) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1;",
                [key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: StateKey, value: &str) -> RepoResult<()> {
        self.conn.execute(PUT_SQL, params![key.as_str(), value])?;
        Ok(())
    }

    fn put_many(&self, entries: &[(StateKey, String)]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for (key, value) in entries {
            tx.execute(PUT_SQL, params![key.as_str(), value.as_str()])?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn ensure_state_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "app_state")? {
        return Err(RepoError::MissingRequiredTable("app_state"));
    }

    for column in ["key", "value"] {
        if !table_has_column(conn, "app_state", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "app_state",
                column,
            });
        }
    }

    Ok(())
}
