//! Core store and persistence layer for the project/module/bug tracker.
//! This crate is the single source of truth for tracking state and its
//! durable mirror.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::bug::{
    Attachment, AttachmentId, Bug, BugId, BugPatch, BugSeverity, BugStatus,
};
pub use model::draft::{BugDraft, DraftValidationError, ModuleDraft, ProjectDraft};
pub use model::module::{Module, ModuleId, ModulePatch, ModuleStatus};
pub use model::project::{Project, ProjectId, ProjectPatch};
pub use model::Selection;
pub use repo::blob_repo::{BlobRef, BlobStore, SqliteBlobStore};
pub use repo::state_repo::{
    RepoError, RepoResult, SqliteStateRepository, StateKey, StateRepository,
};
pub use store::stats::{DashboardStats, ProjectSummary};
pub use store::{seed, StateSnapshot, TrackerStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
