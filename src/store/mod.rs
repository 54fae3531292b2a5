//! The tracker store: single source of truth for projects, modules,
//! bugs, and the derived-view selection state.
//!
//! # Responsibility
//! - Own the three entity collections and the selection state.
//! - Route every mutation through one place, assigning ids and
//!   timestamps.
//! - Mirror each touched piece to the side-store after every mutation.
//!
//! # Invariants
//! - Ids are assigned here, never by callers.
//! - Cascade deletes leave no module or bug referencing a removed
//!   parent, in memory or in the mirror, and write all touched pieces in
//!   one transaction.
//! - Mirror failures never fail a mutation.

mod mirror;
pub mod seed;
pub mod stats;

use log::{info, warn};

use crate::model::bug::{Attachment, AttachmentId, Bug, BugId, BugPatch, BugStatus};
use crate::model::draft::{BugDraft, ModuleDraft, ProjectDraft};
use crate::model::module::{Module, ModuleId, ModulePatch};
use crate::model::project::{Project, ProjectId, ProjectPatch};
use crate::model::Selection;
use crate::repo::state_repo::{StateKey, StateRepository};

/// Full mirrored state of the store: the load-time default unit and the
/// shape handed back by [`TrackerStore::snapshot`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSnapshot {
    pub projects: Vec<Project>,
    pub modules: Vec<Module>,
    pub bugs: Vec<Bug>,
    pub selection: Selection,
}

/// In-memory store over the three collections plus selection state,
/// mirrored to a [`StateRepository`] on every change.
///
/// Constructed once at application start and passed by reference to
/// consumers. All operations are synchronous; reads hand out snapshots
/// of current state.
pub struct TrackerStore<R: StateRepository> {
    projects: Vec<Project>,
    modules: Vec<Module>,
    bugs: Vec<Bug>,
    selection: Selection,
    repo: R,
}

impl<R: StateRepository> TrackerStore<R> {
    /// Loads persisted state, falling back to empty collections.
    pub fn load(repo: R) -> Self {
        Self::load_with_defaults(repo, StateSnapshot::default())
    }

    /// Loads persisted state, falling back to `defaults` piece by piece
    /// for keys that are absent or malformed.
    ///
    /// When no selected-project key was persisted at all, the first
    /// project (if any) becomes selected; a persisted null selection is
    /// respected. Loading performs no writes.
    pub fn load_with_defaults(repo: R, defaults: StateSnapshot) -> Self {
        let loaded = mirror::load_state(&repo, defaults);
        let selection = Selection {
            project_id: loaded
                .selected_project
                .unwrap_or_else(|| loaded.projects.first().map(|project| project.id)),
            module_id: loaded.selected_module.unwrap_or(None),
        };
        info!(
            "event=store_load module=store status=ok projects={} modules={} bugs={}",
            loaded.projects.len(),
            loaded.modules.len(),
            loaded.bugs.len()
        );
        Self {
            projects: loaded.projects,
            modules: loaded.modules,
            bugs: loaded.bugs,
            selection,
            repo,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn bugs(&self) -> &[Bug] {
        &self.bugs
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.iter().find(|module| module.id == id)
    }

    pub fn bug(&self, id: BugId) -> Option<&Bug> {
        self.bugs.iter().find(|bug| bug.id == id)
    }

    /// Copies out the full state, selection included.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            projects: self.projects.clone(),
            modules: self.modules.clone(),
            bugs: self.bugs.clone(),
            selection: self.selection,
        }
    }

    /// All bugs of `project_id`, narrowed to one module when `module_id`
    /// is given. Pure derived read.
    pub fn project_bugs(&self, project_id: ProjectId, module_id: Option<ModuleId>) -> Vec<Bug> {
        self.bugs
            .iter()
            .filter(|bug| {
                bug.project_id == project_id
                    && module_id.map_or(true, |module_id| bug.module_id == module_id)
            })
            .cloned()
            .collect()
    }

    /// Appends a new project and returns it.
    pub fn add_project(&mut self, draft: ProjectDraft) -> Project {
        let project = Project::new(draft.name, draft.description);
        self.projects.push(project.clone());
        self.mirror_piece(StateKey::Projects);
        project
    }

    /// Merges `patch` into the project with `id`. `None` when no project
    /// matches; nothing is written in that case.
    pub fn update_project(&mut self, id: ProjectId, patch: ProjectPatch) -> Option<Project> {
        let updated = {
            let project = self.projects.iter_mut().find(|project| project.id == id)?;
            project.apply(patch);
            project.clone()
        };
        self.mirror_piece(StateKey::Projects);
        Some(updated)
    }

    /// Removes the project and everything referencing it: its modules,
    /// its bugs, and (when it was selected) the selection. All touched
    /// pieces are mirrored in one transaction.
    pub fn delete_project(&mut self, id: ProjectId) {
        if !self.projects.iter().any(|project| project.id == id) {
            return;
        }

        self.projects.retain(|project| project.id != id);
        self.modules.retain(|module| module.project_id != id);
        self.bugs.retain(|bug| bug.project_id != id);
        if self.selection.project_id == Some(id) {
            self.selection = Selection::default();
        }
        self.mirror_pieces(&StateKey::ALL);
    }

    /// Appends a new module and returns it.
    ///
    /// `None` (and no mutation) when the draft's project does not exist:
    /// an orphan must never enter the collections.
    pub fn add_module(&mut self, draft: ModuleDraft) -> Option<Module> {
        if self.project(draft.project_id).is_none() {
            warn!(
                "event=add_module module=store status=dangling_reference project_id={}",
                draft.project_id
            );
            return None;
        }

        let module = Module::new(draft.project_id, draft.name, draft.description, draft.status);
        self.modules.push(module.clone());
        self.mirror_piece(StateKey::Modules);
        Some(module)
    }

    /// Merges `patch` into the module with `id`. `None` when no module
    /// matches.
    pub fn update_module(&mut self, id: ModuleId, patch: ModulePatch) -> Option<Module> {
        let updated = {
            let module = self.modules.iter_mut().find(|module| module.id == id)?;
            module.apply(patch);
            module.clone()
        };
        self.mirror_piece(StateKey::Modules);
        Some(updated)
    }

    /// Removes the module and every bug referencing it; clears the
    /// module selection when it pointed here. Mirrored in one
    /// transaction.
    pub fn delete_module(&mut self, id: ModuleId) {
        if !self.modules.iter().any(|module| module.id == id) {
            return;
        }

        self.modules.retain(|module| module.id != id);
        self.bugs.retain(|bug| bug.module_id != id);
        if self.selection.module_id == Some(id) {
            self.selection.module_id = None;
        }
        self.mirror_pieces(&[StateKey::Modules, StateKey::Bugs, StateKey::SelectedModule]);
    }

    /// Appends a new bug and returns it. Status defaults to open when
    /// the draft leaves it unset.
    ///
    /// `None` (and no mutation) when the draft's project or module does
    /// not exist.
    pub fn add_bug(&mut self, draft: BugDraft) -> Option<Bug> {
        if self.project(draft.project_id).is_none() || self.module(draft.module_id).is_none() {
            warn!(
                "event=add_bug module=store status=dangling_reference project_id={} module_id={}",
                draft.project_id, draft.module_id
            );
            return None;
        }

        let mut bug = Bug::new(
            draft.project_id,
            draft.module_id,
            draft.title,
            draft.description,
            draft.severity,
            draft.status.unwrap_or(BugStatus::Open),
        );
        bug.assignee = draft.assignee;
        self.bugs.push(bug.clone());
        self.mirror_piece(StateKey::Bugs);
        Some(bug)
    }

    /// Merges `patch` into the bug with `id`. `None` when no bug
    /// matches.
    pub fn update_bug(&mut self, id: BugId, patch: BugPatch) -> Option<Bug> {
        let updated = {
            let bug = self.bugs.iter_mut().find(|bug| bug.id == id)?;
            bug.apply(patch);
            bug.clone()
        };
        self.mirror_piece(StateKey::Bugs);
        Some(updated)
    }

    /// Removes the bug with `id`. No-op when it does not exist.
    pub fn delete_bug(&mut self, id: BugId) {
        if !self.bugs.iter().any(|bug| bug.id == id) {
            return;
        }

        self.bugs.retain(|bug| bug.id != id);
        self.mirror_piece(StateKey::Bugs);
    }

    /// Appends an attachment record to the bug with `bug_id` and returns
    /// it. The content itself must already live in the blob store;
    /// `content_ref` names it. `None` when the bug does not exist.
    pub fn add_bug_attachment(
        &mut self,
        bug_id: BugId,
        name: &str,
        content_ref: impl Into<String>,
    ) -> Option<Attachment> {
        let attachment = {
            let bug = self.bugs.iter_mut().find(|bug| bug.id == bug_id)?;
            bug.attach(name, content_ref)
        };
        self.mirror_piece(StateKey::Bugs);
        Some(attachment)
    }

    /// Removes one attachment record from the bug with `bug_id`.
    /// Returns whether a record was removed.
    pub fn remove_bug_attachment(&mut self, bug_id: BugId, attachment_id: AttachmentId) -> bool {
        let removed = self
            .bugs
            .iter_mut()
            .find(|bug| bug.id == bug_id)
            .map(|bug| bug.detach(attachment_id))
            .unwrap_or(false);
        if removed {
            self.mirror_piece(StateKey::Bugs);
        }
        removed
    }

    /// Points the view at a project, or at none. No existence check:
    /// a dangling selection resolves to an empty view at render time.
    pub fn set_selected_project(&mut self, id: Option<ProjectId>) {
        self.selection.project_id = id;
        self.mirror_piece(StateKey::SelectedProject);
    }

    /// Points the view at a module, or at none. No existence check.
    pub fn set_selected_module(&mut self, id: Option<ModuleId>) {
        self.selection.module_id = id;
        self.mirror_piece(StateKey::SelectedModule);
    }

    fn piece_json(&self, key: StateKey) -> Option<String> {
        match key {
            StateKey::Projects => mirror::encode(key, &self.projects),
            StateKey::Modules => mirror::encode(key, &self.modules),
            StateKey::Bugs => mirror::encode(key, &self.bugs),
            StateKey::SelectedProject => mirror::encode(key, &self.selection.project_id),
            StateKey::SelectedModule => mirror::encode(key, &self.selection.module_id),
        }
    }

    fn mirror_piece(&self, key: StateKey) {
        let Some(value) = self.piece_json(key) else {
            return;
        };
        if let Err(err) = self.repo.put(key, &value) {
            warn!("event=state_mirror module=store status=error key={key} error={err}");
        }
    }

    fn mirror_pieces(&self, keys: &[StateKey]) {
        let entries: Vec<(StateKey, String)> = keys
            .iter()
            .filter_map(|&key| self.piece_json(key).map(|value| (key, value)))
            .collect();
        if let Err(err) = self.repo.put_many(&entries) {
            warn!(
                "event=state_mirror module=store status=error keys={} error={err}",
                entries.len()
            );
        }
    }
}
