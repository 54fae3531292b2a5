//! Demo snapshot for first-run installs.
//!
//! Passed as the defaults to [`TrackerStore::load_with_defaults`] so a
//! fresh database opens on something to look at instead of an empty
//! screen. Ignored entirely once any state has been persisted.
//!
//! [`TrackerStore::load_with_defaults`]: super::TrackerStore::load_with_defaults

use crate::model::bug::{Bug, BugSeverity, BugStatus};
use crate::model::module::{Module, ModuleStatus};
use crate::model::project::Project;
use crate::model::Selection;

use super::StateSnapshot;

/// Two projects, two modules under the first, one open bug.
pub fn demo_snapshot() -> StateSnapshot {
    let website = Project::new(
        "Website Redesign",
        "Complete redesign of the company website",
    );
    let mobile = Project::new("Mobile App", "Native mobile application for iOS and Android");

    let homepage = Module::new(
        website.id,
        "Homepage",
        "Main landing page",
        ModuleStatus::InProgress,
    );
    let product_pages = Module::new(
        website.id,
        "Product Pages",
        "Product listing and detail pages",
        ModuleStatus::Planning,
    );

    let header_bug = Bug::new(
        website.id,
        homepage.id,
        "Header alignment issue",
        "Header elements are misaligned on mobile",
        BugSeverity::Medium,
        BugStatus::Open,
    );

    StateSnapshot {
        projects: vec![website, mobile],
        modules: vec![homepage, product_pages],
        bugs: vec![header_bug],
        selection: Selection::default(),
    }
}
