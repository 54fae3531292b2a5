//! Bug domain model.
//!
//! # Responsibility
//! - Define the bug record, its status/severity vocabulary, and the
//!   attachment records hanging off it.
//!
//! # Invariants
//! - `project_id`/`module_id` reference entities that existed when the
//!   bug was created.
//! - Attachment content never lives inside the record; `content_ref`
//!   names it in the blob store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::module::ModuleId;
use super::project::ProjectId;

/// Stable identifier for a bug.
pub type BugId = Uuid;

/// Stable identifier for an attachment record.
pub type AttachmentId = Uuid;

/// Impact classification chosen at filing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BugSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// Triage lifecycle of a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BugStatus {
    /// Filed, nobody working on it. The default for new bugs.
    Open,
    InProgress,
    /// Fix landed, awaiting confirmation.
    Resolved,
    Closed,
}

/// File attached to a bug. Content lives in the blob store; this record
/// only carries the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: AttachmentId,
    /// Display name, usually the uploaded file name.
    pub name: String,
    /// Hex SHA-256 blob reference resolvable through the blob store.
    pub content_ref: String,
    pub uploaded_at: DateTime<Utc>,
}

/// A defect filed against one module of one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bug {
    pub id: BugId,
    pub project_id: ProjectId,
    pub module_id: ModuleId,
    pub title: String,
    pub description: String,
    pub severity: BugSeverity,
    pub status: BugStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bug {
    /// Creates a bug with a fresh id, no assignee, no attachments, and
    /// `created_at == updated_at`.
    pub fn new(
        project_id: ProjectId,
        module_id: ModuleId,
        title: impl Into<String>,
        description: impl Into<String>,
        severity: BugSeverity,
        status: BugStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            module_id,
            title: title.into(),
            description: description.into(),
            severity,
            status,
            assignee: None,
            attachments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges a partial update and touches `updated_at`.
    pub fn apply(&mut self, patch: BugPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(severity) = patch.severity {
            self.severity = severity;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(assignee) = patch.assignee {
            self.assignee = assignee;
        }
        self.updated_at = Utc::now();
    }

    /// Appends an attachment record and touches `updated_at`.
    ///
    /// Returns a copy of the appended record.
    pub fn attach(&mut self, name: impl Into<String>, content_ref: impl Into<String>) -> Attachment {
        let attachment = Attachment {
            id: Uuid::new_v4(),
            name: name.into(),
            content_ref: content_ref.into(),
            uploaded_at: Utc::now(),
        };
        self.attachments.push(attachment.clone());
        self.updated_at = Utc::now();
        attachment
    }

    /// Removes an attachment record by id.
    ///
    /// Returns whether a record was removed; `updated_at` only moves when
    /// one was.
    pub fn detach(&mut self, attachment_id: AttachmentId) -> bool {
        let before = self.attachments.len();
        self.attachments.retain(|attachment| attachment.id != attachment_id);
        let removed = self.attachments.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }
}

/// Partial update for a bug. Carries no foreign keys.
///
/// `assignee` is doubly optional: `None` leaves the field unchanged,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct BugPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<BugSeverity>,
    pub status: Option<BugStatus>,
    pub assignee: Option<Option<String>>,
}
