//! Draft inputs for create operations and their boundary validation.
//!
//! # Responsibility
//! - Carry the caller-supplied fields of a new entity (everything except
//!   id and timestamps, which the store assigns).
//! - Enforce the form-boundary field rules before a draft reaches the
//!   store.
//!
//! # Invariants
//! - Minimum lengths are counted in characters after trimming.
//! - Store operations accept drafts without re-validating; callers run
//!   `validate()` first.

use std::error::Error;
use std::fmt::{Display, Formatter};

use super::bug::{BugSeverity, BugStatus};
use super::module::{ModuleId, ModuleStatus};
use super::project::ProjectId;

const NAME_MIN_CHARS: usize = 3;
const TITLE_MIN_CHARS: usize = 5;
const DESCRIPTION_MIN_CHARS: usize = 10;

/// Field-level rejection of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftValidationError {
    /// Field is empty or whitespace-only.
    FieldRequired { field: &'static str },
    /// Field has fewer than `min_chars` characters after trimming.
    FieldTooShort { field: &'static str, min_chars: usize },
}

impl Display for DraftValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldRequired { field } => write!(f, "{field} is required"),
            Self::FieldTooShort { field, min_chars } => {
                write!(f, "{field} must be at least {min_chars} characters")
            }
        }
    }
}

impl Error for DraftValidationError {}

/// Caller-supplied fields of a new project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
}

impl ProjectDraft {
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        check_min_chars(&self.name, "name", NAME_MIN_CHARS)?;
        check_min_chars(&self.description, "description", DESCRIPTION_MIN_CHARS)
    }
}

/// Caller-supplied fields of a new module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDraft {
    pub project_id: ProjectId,
    pub name: String,
    pub description: String,
    pub status: ModuleStatus,
}

impl ModuleDraft {
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        check_min_chars(&self.name, "name", NAME_MIN_CHARS)?;
        check_min_chars(&self.description, "description", DESCRIPTION_MIN_CHARS)
    }
}

/// Caller-supplied fields of a new bug.
///
/// `status` defaults to open when left unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugDraft {
    pub project_id: ProjectId,
    pub module_id: ModuleId,
    pub title: String,
    pub description: String,
    pub severity: BugSeverity,
    pub status: Option<BugStatus>,
    pub assignee: Option<String>,
}

impl BugDraft {
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        check_min_chars(&self.title, "title", TITLE_MIN_CHARS)?;
        check_min_chars(&self.description, "description", DESCRIPTION_MIN_CHARS)
    }
}

fn check_min_chars(
    value: &str,
    field: &'static str,
    min_chars: usize,
) -> Result<(), DraftValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DraftValidationError::FieldRequired { field });
    }
    if trimmed.chars().count() < min_chars {
        return Err(DraftValidationError::FieldTooShort { field, min_chars });
    }
    Ok(())
}
