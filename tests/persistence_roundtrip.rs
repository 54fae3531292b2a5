use bugtracker_core::db::{open_db, open_db_in_memory};
use bugtracker_core::{
    seed, BugDraft, BugPatch, BugSeverity, BugStatus, ModuleDraft, ModuleStatus, ProjectDraft,
    RepoError, RepoResult, SqliteStateRepository, StateKey, StateRepository, TrackerStore,
};

#[test]
fn full_state_survives_reload_structurally_equal() {
    let conn = open_db_in_memory().unwrap();

    let before = {
        let repo = SqliteStateRepository::try_new(&conn).unwrap();
        let mut store = TrackerStore::load(repo);

        let project = store.add_project(project_draft("Persisted project"));
        let module = store
            .add_module(module_draft(project.id, "Persisted module"))
            .unwrap();
        let bug = store
            .add_bug(bug_draft(project.id, module.id, "Persisted defect"))
            .unwrap();
        store
            .update_bug(
                bug.id,
                BugPatch {
                    assignee: Some(Some("morgan".to_string())),
                    status: Some(BugStatus::Resolved),
                    ..BugPatch::default()
                },
            )
            .unwrap();
        store
            .add_bug_attachment(bug.id, "trace.log", "a".repeat(64))
            .unwrap();
        store.set_selected_project(Some(project.id));
        store.set_selected_module(Some(module.id));
        store.snapshot()
    };

    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let reloaded = TrackerStore::load(repo);

    assert_eq!(reloaded.snapshot(), before);
}

#[test]
fn state_survives_process_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracker.db");

    let before = {
        let conn = open_db(&path).unwrap();
        let repo = SqliteStateRepository::try_new(&conn).unwrap();
        let mut store = TrackerStore::load(repo);
        let project = store.add_project(project_draft("On-disk project"));
        store
            .add_module(module_draft(project.id, "On-disk module"))
            .unwrap();
        store.set_selected_project(Some(project.id));
        store.snapshot()
    };

    let conn = open_db(&path).unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let reloaded = TrackerStore::load(repo);

    assert_eq!(reloaded.snapshot(), before);
}

#[test]
fn malformed_piece_falls_back_to_default_without_touching_others() {
    let conn = open_db_in_memory().unwrap();

    {
        let repo = SqliteStateRepository::try_new(&conn).unwrap();
        let mut store = TrackerStore::load(repo);
        let project = store.add_project(project_draft("Kept project"));
        let module = store
            .add_module(module_draft(project.id, "Kept module"))
            .unwrap();
        store
            .add_bug(bug_draft(project.id, module.id, "Lost defect"))
            .unwrap();
    }

    conn.execute(
        "UPDATE app_state SET value = 'not json at all' WHERE key = 'bugs';",
        [],
    )
    .unwrap();

    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let reloaded = TrackerStore::load(repo);

    assert!(reloaded.bugs().is_empty());
    assert_eq!(reloaded.projects().len(), 1);
    assert_eq!(reloaded.modules().len(), 1);
}

#[test]
fn absent_keys_fall_back_to_caller_defaults() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();

    let store = TrackerStore::load_with_defaults(repo, seed::demo_snapshot());

    assert_eq!(store.projects().len(), 2);
    assert_eq!(store.modules().len(), 2);
    assert_eq!(store.bugs().len(), 1);
    assert_eq!(
        store.selection().project_id,
        Some(store.projects()[0].id),
        "first project becomes selected on first load"
    );
}

#[test]
fn persisted_state_wins_over_caller_defaults() {
    let conn = open_db_in_memory().unwrap();

    {
        let repo = SqliteStateRepository::try_new(&conn).unwrap();
        let mut store = TrackerStore::load(repo);
        store.add_project(project_draft("Real project"));
    }

    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let store = TrackerStore::load_with_defaults(repo, seed::demo_snapshot());

    assert_eq!(store.projects().len(), 1);
    assert_eq!(store.projects()[0].name, "Real project");
}

#[test]
fn loading_performs_no_writes() {
    let conn = open_db_in_memory().unwrap();

    {
        let repo = SqliteStateRepository::try_new(&conn).unwrap();
        let _store = TrackerStore::load_with_defaults(repo, seed::demo_snapshot());
    }

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM app_state;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0, "seed defaults must not be written back at load");
}

/// Repository double whose writes always fail.
struct FailingRepository;

impl StateRepository for FailingRepository {
    fn get(&self, _key: StateKey) -> RepoResult<Option<String>> {
        Ok(None)
    }

    fn put(&self, _key: StateKey, _value: &str) -> RepoResult<()> {
        Err(RepoError::MissingRequiredTable("app_state"))
    }

    fn put_many(&self, _entries: &[(StateKey, String)]) -> RepoResult<()> {
        Err(RepoError::MissingRequiredTable("app_state"))
    }
}

#[test]
fn failing_mirror_never_blocks_mutations() {
    let mut store = TrackerStore::load(FailingRepository);

    let project = store.add_project(project_draft("In-memory project"));
    let module = store
        .add_module(module_draft(project.id, "In-memory module"))
        .unwrap();
    let bug = store
        .add_bug(bug_draft(project.id, module.id, "In-memory defect"))
        .unwrap();
    store.delete_module(module.id);

    assert_eq!(store.projects().len(), 1);
    assert!(store.modules().is_empty());
    assert!(store.bug(bug.id).is_none());
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
        severity: BugSeverity::Critical,
        status: None,
        assignee: None,
    }
}
