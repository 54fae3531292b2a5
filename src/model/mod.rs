//! Domain model for the project/module/bug hierarchy.
//!
//! # Responsibility
//! - Define canonical entity structs shared by the store and the mirror.
//! - Keep the serde layout of the persisted JSON pieces stable.
//!
//! # Invariants
//! - Every entity is identified by a stable uuid-backed id alias.
//! - `created_at` never changes after creation; `updated_at` moves on
//!   every merge.

pub mod bug;
pub mod draft;
pub mod module;
pub mod project;

use module::ModuleId;
use project::ProjectId;

/// Ephemeral navigation state naming the project/module currently in
/// view. Not an entity: it has no lifecycle of its own, but it is
/// mirrored so the view survives a restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub project_id: Option<ProjectId>,
    pub module_id: Option<ModuleId>,
}
