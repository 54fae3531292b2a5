//! JSON encode/decode for the mirrored state pieces.
//!
//! # Responsibility
//! - Turn state pieces into the JSON blobs the side-store holds, and
//!   back.
//! - Absorb malformed or unreadable persisted data: any piece that fails
//!   to load falls back to its default and is logged, never surfaced.
//!
//! # Invariants
//! - Loading performs no writes.
//! - Date-valued fields round-trip losslessly (RFC 3339 via serde).

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::bug::Bug;
use crate::model::module::{Module, ModuleId};
use crate::model::project::{Project, ProjectId};
use crate::repo::state_repo::{StateKey, StateRepository};

use super::StateSnapshot;

/// Raw load result. Selection pieces distinguish "key absent" (outer
/// `None`) from "present and null" (`Some(None)`) so first-load defaults
/// only apply to the former.
pub(super) struct LoadedState {
    pub projects: Vec<Project>,
    pub modules: Vec<Module>,
    pub bugs: Vec<Bug>,
    pub selected_project: Option<Option<ProjectId>>,
    pub selected_module: Option<Option<ModuleId>>,
}

pub(super) fn load_state(repo: &impl StateRepository, defaults: StateSnapshot) -> LoadedState {
    LoadedState {
        projects: load_collection(repo, StateKey::Projects, defaults.projects),
        modules: load_collection(repo, StateKey::Modules, defaults.modules),
        bugs: load_collection(repo, StateKey::Bugs, defaults.bugs),
        selected_project: load_selection_piece(repo, StateKey::SelectedProject),
        selected_module: load_selection_piece(repo, StateKey::SelectedModule),
    }
}

pub(super) fn encode<T: Serialize>(key: StateKey, value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(raw) => Some(raw),
        Err(err) => {
            warn!("event=state_encode module=store status=error key={key} error={err}");
            None
        }
    }
}

fn load_collection<T: DeserializeOwned>(
    repo: &impl StateRepository,
    key: StateKey,
    default: Vec<T>,
) -> Vec<T> {
    match read_raw(repo, key) {
        Some(raw) => decode(key, &raw).unwrap_or(default),
        None => default,
    }
}

fn load_selection_piece(
    repo: &impl StateRepository,
    key: StateKey,
) -> Option<Option<uuid::Uuid>> {
    let raw = read_raw(repo, key)?;
    decode(key, &raw)
}

fn read_raw(repo: &impl StateRepository, key: StateKey) -> Option<String> {
    match repo.get(key) {
        Ok(value) => value,
        Err(err) => {
            warn!("event=state_load module=store status=error key={key} error={err}");
            None
        }
    }
}

fn decode<T: DeserializeOwned>(key: StateKey, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("event=state_decode module=store status=malformed key={key} error={err}");
            None
        }
    }
}
