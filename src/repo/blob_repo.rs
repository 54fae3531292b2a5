//! Content-addressable store for attachment bytes.
//!
//! # Responsibility
//! - Store attachment content once per distinct byte sequence.
//! - Resolve blob references back to bytes.
//!
//! # Invariants
//! - A reference is the lowercase hex SHA-256 digest of the content.
//! - Storing identical bytes is idempotent and returns the same
//!   reference.

use crate::db::migrations::latest_version;
use crate::repo::state_repo::{RepoError, RepoResult};
use crate::repo::{table_exists, table_has_column};
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};

/// Reference naming stored attachment content.
pub type BlobRef = String;

/// Narrow seam between bug attachments and their byte content.
pub trait BlobStore {
    /// Stores `bytes` and returns the reference naming them.
    fn store_blob(&self, bytes: &[u8]) -> RepoResult<BlobRef>;
    /// Resolves a reference back to bytes. `None` for unknown references.
    fn load_blob(&self, reference: &str) -> RepoResult<Option<Vec<u8>>>;
}

/// SQLite-backed blob store over the `attachment_blobs` table.
pub struct SqliteBlobStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlobStore<'conn> {
    /// Constructs a blob store from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_blob_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BlobStore for SqliteBlobStore<'_> {
    fn store_blob(&self, bytes: &[u8]) -> RepoResult<BlobRef> {
        let digest = hex::encode(Sha256::digest(bytes));
        // INSERT OR IGNORE: identical content is already present under
        // the same digest.
        self.conn.execute(
            "INSERT OR IGNORE INTO attachment_blobs (digest, content, byte_len)
             VALUES (?1, ?2, ?3);",
            params![digest.as_str(), bytes, bytes.len() as i64],
        )?;
        Ok(digest)
    }

    fn load_blob(&self, reference: &str) -> RepoResult<Option<Vec<u8>>> {
        let content = self
            .conn
            .query_row(
                "SELECT content FROM attachment_blobs WHERE digest = ?1;",
                [reference],
                |row| row.get(0),
            )
            .optional()?;
        Ok(content)
    }
}

fn ensure_blob_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "attachment_blobs")? {
        return Err(RepoError::MissingRequiredTable("attachment_blobs"));
    }

    for column in ["digest", "content"] {
        if !table_has_column(conn, "attachment_blobs", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "attachment_blobs",
                column,
            });
        }
    }

    Ok(())
}
