use bugtracker_core::db::open_db_in_memory;
use bugtracker_core::{
    BugDraft, BugPatch, BugSeverity, BugStatus, ModuleDraft, ModuleStatus, ProjectDraft,
    ProjectPatch, SqliteStateRepository, TrackerStore,
};
use std::collections::HashSet;

#[test]
fn add_project_assigns_fresh_id_and_equal_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo);

    let first = store.add_project(project_draft("First project"));
    let second = store.add_project(project_draft("Second project"));

    assert_ne!(first.id, second.id);
    assert_eq!(first.created_at, first.updated_at);
    assert_eq!(first.name, "First project");
    assert_eq!(store.projects().len(), 2);

    let ids: HashSet<_> = store.projects().iter().map(|project| project.id).collect();
    assert_eq!(ids.len(), 2);
}

#[test]
fn add_bug_defaults_status_to_open() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo);

    let project = store.add_project(project_draft("Tracked project"));
    let module = store
        .add_module(module_draft(project.id, "Login module"))
        .unwrap();
    let bug = store
        .add_bug(bug_draft(project.id, module.id, "Crash on submit"))
        .unwrap();

    assert_eq!(bug.status, BugStatus::Open);
    assert_eq!(bug.created_at, bug.updated_at);
    assert!(bug.assignee.is_none());
    assert!(bug.attachments.is_empty());
}

#[test]
fn add_bug_respects_explicit_status_and_assignee() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo);

    let project = store.add_project(project_draft("Tracked project"));
    let module = store
        .add_module(module_draft(project.id, "Login module"))
        .unwrap();

    let mut draft = bug_draft(project.id, module.id, "Crash on submit");
    draft.status = Some(BugStatus::InProgress);
    draft.assignee = Some("sam".to_string());
    let bug = store.add_bug(draft).unwrap();

    assert_eq!(bug.status, BugStatus::InProgress);
    assert_eq!(bug.assignee.as_deref(), Some("sam"));
}

#[test]
fn update_project_merges_only_given_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo);

    let created = store.add_project(project_draft("Before rename"));
    let updated = store
        .update_project(
            created.id,
            ProjectPatch {
                description: Some("a different long description".to_string()),
                ..ProjectPatch::default()
            },
        )
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.description, "a different long description");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[test]
fn update_missing_ids_return_none_and_change_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo);

    let project = store.add_project(project_draft("Only project"));
    let before = store.snapshot();

    let missing = uuid::Uuid::new_v4();
    assert!(store.update_project(missing, ProjectPatch::default()).is_none());
    assert!(store.update_module(missing, Default::default()).is_none());
    assert!(store.update_bug(missing, BugPatch::default()).is_none());

    assert_eq!(store.snapshot(), before);
    assert_eq!(store.project(project.id).unwrap().name, "Only project");
}

#[test]
fn update_module_status_moves_only_status() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo);

    let project = store.add_project(project_draft("Tracked project"));
    let module = store
        .add_module(module_draft(project.id, "Login module"))
        .unwrap();

    let updated = store
        .update_module(
            module.id,
            bugtracker_core::ModulePatch {
                status: Some(ModuleStatus::Completed),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.status, ModuleStatus::Completed);
    assert_eq!(updated.name, module.name);
    assert_eq!(updated.description, module.description);
    assert_eq!(updated.created_at, module.created_at);
}

#[test]
fn update_bug_can_set_and_clear_assignee() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo);

    let project = store.add_project(project_draft("Tracked project"));
    let module = store
        .add_module(module_draft(project.id, "Login module"))
        .unwrap();
    let bug = store
        .add_bug(bug_draft(project.id, module.id, "Crash on submit"))
        .unwrap();

    let assigned = store
        .update_bug(
            bug.id,
            BugPatch {
                assignee: Some(Some("alex".to_string())),
                ..BugPatch::default()
            },
        )
        .unwrap();
    assert_eq!(assigned.assignee.as_deref(), Some("alex"));

    let unassigned = store
        .update_bug(
            bug.id,
            BugPatch {
                assignee: Some(None),
                ..BugPatch::default()
            },
        )
        .unwrap();
    assert!(unassigned.assignee.is_none());

    let untouched = store
        .update_bug(
            bug.id,
            BugPatch {
                title: Some("Crash on submit twice".to_string()),
                ..BugPatch::default()
            },
        )
        .unwrap();
    assert!(untouched.assignee.is_none());
    assert_eq!(untouched.title, "Crash on submit twice");
}

#[test]
fn delete_bug_removes_only_that_bug() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo);

    let project = store.add_project(project_draft("Tracked project"));
    let module = store
        .add_module(module_draft(project.id, "Login module"))
        .unwrap();
    let kept = store
        .add_bug(bug_draft(project.id, module.id, "Kept defect"))
        .unwrap();
    let removed = store
        .add_bug(bug_draft(project.id, module.id, "Removed defect"))
        .unwrap();

    store.delete_bug(removed.id);

    assert_eq!(store.bugs().len(), 1);
    assert_eq!(store.bugs()[0].id, kept.id);
    assert_eq!(store.modules().len(), 1);
}

#[test]
fn project_bugs_filters_by_project_and_module() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo);

    let alpha = store.add_project(project_draft("Alpha project"));
    let beta = store.add_project(project_draft("Beta project"));
    let alpha_module = store
        .add_module(module_draft(alpha.id, "Alpha module"))
        .unwrap();
    let other_module = store
        .add_module(module_draft(alpha.id, "Other module"))
        .unwrap();
    let beta_module = store
        .add_module(module_draft(beta.id, "Beta module"))
        .unwrap();

    let in_alpha = store
        .add_bug(bug_draft(alpha.id, alpha_module.id, "Alpha defect"))
        .unwrap();
    store
        .add_bug(bug_draft(alpha.id, other_module.id, "Other defect"))
        .unwrap();
    store
        .add_bug(bug_draft(beta.id, beta_module.id, "Beta defect"))
        .unwrap();

    let all_alpha = store.project_bugs(alpha.id, None);
    assert_eq!(all_alpha.len(), 2);

    let narrowed = store.project_bugs(alpha.id, Some(alpha_module.id));
    assert_eq!(narrowed.len(), 1);
    assert_eq!(narrowed[0].id, in_alpha.id);

    let none = store.project_bugs(alpha.id, Some(beta_module.id));
    assert!(none.is_empty());

    let unknown = store.project_bugs(uuid::Uuid::new_v4(), None);
    assert!(unknown.is_empty());
}

fn project_draft(name: &str) -> ProjectDraft {
    ProjectDraft {
        name: name.to_string(),
        description: "a sufficiently long description".to_string(),
    }
}

fn module_draft(project_id: bugtracker_core::ProjectId, name: &str) -> ModuleDraft {
    ModuleDraft {
        project_id,
        name: name.to_string(),
        description: "a sufficiently long description".to_string(),
        status: ModuleStatus::Planning,
    }
}

fn bug_draft(
    project_id: bugtracker_core::ProjectId,
    module_id: bugtracker_core::ModuleId,
    title: &str,
) -> BugDraft {
    BugDraft {
        project_id,
        module_id,
        title: title.to_string(),
        description: "a sufficiently long description".to_string(),
        severity: BugSeverity::High,
        status: None,
        assignee: None,
    }
}
