//! Derived dashboard counters over the in-memory collections.
//!
//! Pure reads: nothing here touches the mirror.

use crate::model::bug::BugStatus;
use crate::model::module::ModuleStatus;
use crate::model::project::ProjectId;
use crate::repo::state_repo::StateRepository;

use super::TrackerStore;

/// Point-in-time rollup of the whole store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_projects: usize,
    pub total_modules: usize,
    pub total_bugs: usize,
    pub open_bugs: usize,
    pub in_progress_bugs: usize,
    pub resolved_bugs: usize,
    pub closed_bugs: usize,
    pub completed_modules: usize,
    pub in_progress_modules: usize,
    pub project_summaries: Vec<ProjectSummary>,
}

/// Per-project rollup, in project collection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub project_id: ProjectId,
    pub name: String,
    pub module_count: usize,
    pub bug_count: usize,
    pub open_bug_count: usize,
}

impl<R: StateRepository> TrackerStore<R> {
    /// Computes the dashboard rollup from current state.
    pub fn dashboard_stats(&self) -> DashboardStats {
        let bugs_with_status = |status: BugStatus| {
            self.bugs()
                .iter()
                .filter(|bug| bug.status == status)
                .count()
        };
        let modules_with_status = |status: ModuleStatus| {
            self.modules()
                .iter()
                .filter(|module| module.status == status)
                .count()
        };

        let project_summaries = self
            .projects()
            .iter()
            .map(|project| ProjectSummary {
                project_id: project.id,
                name: project.name.clone(),
                module_count: self
                    .modules()
                    .iter()
                    .filter(|module| module.project_id == project.id)
                    .count(),
                bug_count: self
                    .bugs()
                    .iter()
                    .filter(|bug| bug.project_id == project.id)
                    .count(),
                open_bug_count: self
                    .bugs()
                    .iter()
                    .filter(|bug| bug.project_id == project.id && bug.status == BugStatus::Open)
                    .count(),
            })
            .collect();

        DashboardStats {
            total_projects: self.projects().len(),
            total_modules: self.modules().len(),
            total_bugs: self.bugs().len(),
            open_bugs: bugs_with_status(BugStatus::Open),
            in_progress_bugs: bugs_with_status(BugStatus::InProgress),
            resolved_bugs: bugs_with_status(BugStatus::Resolved),
            closed_bugs: bugs_with_status(BugStatus::Closed),
            completed_modules: modules_with_status(ModuleStatus::Completed),
            in_progress_modules: modules_with_status(ModuleStatus::InProgress),
            project_summaries,
        }
    }
}
