//! Module domain model.
//!
//! # Invariants
//! - `project_id` references a project that existed when the module was
//!   created.
//! - Deleting a module cascades to its bugs (enforced by the store).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::project::ProjectId;

/// Stable identifier for a module.
pub type ModuleId = Uuid;

/// Delivery state of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleStatus {
    /// Scoped but not started.
    Planning,
    /// Work is underway.
    InProgress,
    /// Delivered.
    Completed,
}

/// A unit of work inside a project; the parent of bugs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: ModuleId,
    pub project_id: ProjectId,
    pub name: String,
    pub description: String,
    pub status: ModuleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Module {
    /// Creates a module with a fresh id and `created_at == updated_at`.
    pub fn new(
        project_id: ProjectId,
        name: impl Into<String>,
        description: impl Into<String>,
        status: ModuleStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            name: name.into(),
            description: description.into(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges a partial update and touches `updated_at`.
    pub fn apply(&mut self, patch: ModulePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

/// Partial update for a module. Carries no foreign keys: a module cannot
/// be moved to another project through a patch.
#[derive(Debug, Clone, Default)]
pub struct ModulePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ModuleStatus>,
}
