//! End-to-end sync pipeline tests
//!
//! Drive the full extract / reconstruct / plan / apply / commit pipeline
//! against a real temporary directory and a scriptable in-memory session.

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use ddl_core::{CommitOutcome, CommitRequest, ExecuteOptions, SyncAction, SyncEngine};
use ddl_fs::NormalizedPath;
use ddl_test_utils::session::{MockSession, identity, simple_record, sql_procedure_record};
use ddl_warehouse::{ObjectType, Platform, Scope, adapter_for};

fn scope() -> Scope {
    Scope::new("ANALYTICS", "PUBLIC")
}

fn engine(root: &std::path::Path, session: MockSession) -> SyncEngine {
    SyncEngine::new(
        NormalizedPath::new(root),
        scope(),
        adapter_for(Platform::Snowflake),
        Box::new(session),
    )
}

fn commit_options() -> ExecuteOptions {
    ExecuteOptions {
        dry_run: false,
        commit: Some(CommitRequest::default()),
    }
}

/// Day-one state: one view and one procedure.
fn baseline_session() -> MockSession {
    MockSession::new()
        .with_record(simple_record(
            &scope(),
            ObjectType::View,
            "ACTIVE_CUSTOMERS",
            "CREATE VIEW ACTIVE_CUSTOMERS AS SELECT * FROM CUSTOMERS WHERE ACTIVE;",
        ))
        .with_record(sql_procedure_record(
            &scope(),
            "OLD_PROC",
            "()",
            "VARCHAR",
            "BEGIN\nRETURN 'old';\nEND;",
        ))
}

/// Day-two state: new table, redefined view, procedure dropped.
fn changed_session() -> MockSession {
    MockSession::new()
        .with_record(simple_record(
            &scope(),
            ObjectType::Table,
            "ORDERS",
            "CREATE TABLE ORDERS (ID NUMBER, AMOUNT NUMBER(10,2));",
        ))
        .with_record(simple_record(
            &scope(),
            ObjectType::View,
            "ACTIVE_CUSTOMERS",
            "CREATE VIEW ACTIVE_CUSTOMERS AS SELECT ID FROM CUSTOMERS WHERE ACTIVE;",
        ))
}

#[test]
fn changed_warehouse_plans_create_update_delete_in_order() {
    let dir = TempDir::new().unwrap();
    engine(dir.path(), baseline_session())
        .sync(&ExecuteOptions::default())
        .unwrap();

    let engine = engine(dir.path(), changed_session());
    let extraction = engine.build_current_inventory().unwrap();
    let on_disk = engine.load_disk_inventory().unwrap();
    let plan = engine.compute_plan(&extraction.inventory, &on_disk).unwrap();

    let kinds: Vec<(&str, &str)> = plan
        .actions
        .iter()
        .map(|a| {
            let kind = match a {
                SyncAction::Create { .. } => "create",
                SyncAction::Update { .. } => "update",
                SyncAction::Delete { .. } => "delete",
            };
            (kind, a.identity().name.as_str())
        })
        .collect();

    // Create/Update identities come from the warehouse; the Delete identity
    // is re-derived from the sanitized on-disk path, hence the lowercase.
    assert_eq!(
        kinds,
        vec![
            ("create", "ORDERS"),
            ("update", "ACTIVE_CUSTOMERS"),
            ("delete", "old_proc"),
        ]
    );
    assert_eq!(
        plan.deletes().next().unwrap().rel_path().as_str(),
        "analytics/public/stored_procedures/old_proc.sql"
    );
}

#[test]
fn apply_reconciles_the_tree_and_commits_once() {
    let dir = TempDir::new().unwrap();
    engine(dir.path(), baseline_session())
        .sync(&commit_options())
        .unwrap();

    let report = engine(dir.path(), changed_session())
        .sync(&commit_options())
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.updated.len(), 1);
    assert_eq!(report.deleted.len(), 1);

    assert!(dir.path().join("analytics/public/tables/orders.sql").exists());
    assert!(dir
        .path()
        .join("analytics/public/views/active_customers.sql")
        .exists());
    assert!(!dir
        .path()
        .join("analytics/public/stored_procedures/old_proc.sql")
        .exists());
    // Deleting the last procedure prunes its now-empty type directory.
    assert!(!dir.path().join("analytics/public/stored_procedures").exists());

    let Some(CommitOutcome::Committed { id }) = &report.commit else {
        panic!("expected a commit, got {:?}", report.commit);
    };

    let repo = git2::Repository::open(dir.path()).unwrap();
    let commit = repo
        .find_commit(git2::Oid::from_str(id).unwrap())
        .unwrap();
    let parent = commit.parent(0).unwrap();
    let diff = repo
        .diff_tree_to_tree(
            Some(&parent.tree().unwrap()),
            Some(&commit.tree().unwrap()),
            None,
        )
        .unwrap();
    assert_eq!(diff.deltas().count(), 3);
    assert!(commit.message().unwrap().starts_with("Sync DDL: 1 created, 1 updated, 1 deleted"));

    assert!(ddl_git::dirty_paths(&NormalizedPath::new(dir.path()))
        .unwrap()
        .is_empty());
}

#[test]
fn dry_run_reports_the_plan_but_mutates_nothing() {
    let dir = TempDir::new().unwrap();
    engine(dir.path(), baseline_session())
        .sync(&commit_options())
        .unwrap();

    let report = engine(dir.path(), changed_session())
        .sync(&ExecuteOptions {
            dry_run: true,
            commit: Some(CommitRequest::default()),
        })
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.touched(), 3);
    assert!(report.commit.is_none());

    // Disk still reflects the baseline run.
    assert!(!dir.path().join("analytics/public/tables/orders.sql").exists());
    assert!(dir
        .path()
        .join("analytics/public/stored_procedures/old_proc.sql")
        .exists());
    assert!(ddl_git::dirty_paths(&NormalizedPath::new(dir.path()))
        .unwrap()
        .is_empty());
}

#[test]
fn repeated_sync_converges_to_an_empty_plan() {
    let dir = TempDir::new().unwrap();
    engine(dir.path(), changed_session())
        .sync(&commit_options())
        .unwrap();

    let report = engine(dir.path(), changed_session())
        .sync(&commit_options())
        .unwrap();

    assert_eq!(report.touched(), 0);
    // Nothing touched, so no second commit either.
    assert!(report.commit.is_none());
}

#[test]
fn renamed_object_moves_its_file() {
    let dir = TempDir::new().unwrap();
    let before = MockSession::new().with_record(simple_record(
        &scope(),
        ObjectType::Table,
        "CUSTOMER_STAGING",
        "CREATE TABLE CUSTOMER_STAGING (ID NUMBER);",
    ));
    engine(dir.path(), before).sync(&ExecuteOptions::default()).unwrap();

    let after = MockSession::new().with_record(simple_record(
        &scope(),
        ObjectType::Table,
        "CUSTOMER_LANDING",
        "CREATE TABLE CUSTOMER_LANDING (ID NUMBER);",
    ));
    let report = engine(dir.path(), after).sync(&ExecuteOptions::default()).unwrap();

    assert_eq!(report.created.len(), 1);
    assert_eq!(report.deleted.len(), 1);
    assert!(dir
        .path()
        .join("analytics/public/tables/customer_landing.sql")
        .exists());
    assert!(!dir
        .path()
        .join("analytics/public/tables/customer_staging.sql")
        .exists());
}

#[test]
fn unreadable_objects_are_skipped_without_blocking_the_run() {
    let dir = TempDir::new().unwrap();
    let session = MockSession::new()
        .with_record(simple_record(
            &scope(),
            ObjectType::Table,
            "GOOD",
            "CREATE TABLE GOOD ();",
        ))
        .with_denied(simple_record(
            &scope(),
            ObjectType::Table,
            "FORBIDDEN",
            "CREATE TABLE FORBIDDEN ();",
        ))
        .with_vanishing(simple_record(
            &scope(),
            ObjectType::View,
            "GHOST",
            "CREATE VIEW GHOST AS SELECT 1;",
        ));

    let report = engine(dir.path(), session)
        .sync(&ExecuteOptions::default())
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.skipped.len(), 2);
    assert!(dir.path().join("analytics/public/tables/good.sql").exists());
}

#[test]
fn out_of_scope_objects_never_reach_the_tree() {
    let dir = TempDir::new().unwrap();
    let other_scope = Scope::new("ANALYTICS", "PRIVATE");
    let session = MockSession::new()
        .with_record(simple_record(
            &scope(),
            ObjectType::Table,
            "IN_SCOPE",
            "CREATE TABLE IN_SCOPE ();",
        ))
        .with_record(simple_record(
            &other_scope,
            ObjectType::Table,
            "ELSEWHERE",
            "CREATE TABLE ELSEWHERE ();",
        ));

    let report = engine(dir.path(), session)
        .sync(&ExecuteOptions::default())
        .unwrap();

    assert_eq!(report.created.len(), 1);
    assert!(!dir.path().join("analytics/private").exists());
}

#[test]
fn foreign_files_in_the_tree_are_left_alone() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("README.md"), "# DDL tree\n").unwrap();
    std::fs::create_dir_all(dir.path().join(".github")).unwrap();
    std::fs::write(dir.path().join(".github/keep"), "").unwrap();

    let report = engine(dir.path(), changed_session())
        .sync(&ExecuteOptions::default())
        .unwrap();

    assert!(report.is_clean());
    assert!(dir.path().join("README.md").exists());
    assert!(dir.path().join(".github/keep").exists());
}

#[test]
fn sanitized_name_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let session = || {
        MockSession::new().with_record(simple_record(
            &scope(),
            ObjectType::Table,
            "MY ORDERS",
            "CREATE TABLE \"MY ORDERS\" (ID NUMBER);",
        ))
    };

    engine(dir.path(), session())
        .sync(&ExecuteOptions::default())
        .unwrap();
    assert!(dir.path().join("analytics/public/tables/my_orders.sql").exists());

    // Identity joins on the derived path, so the second run is a no-op even
    // though the on-disk name is the sanitized form.
    let report = engine(dir.path(), session())
        .sync(&ExecuteOptions::default())
        .unwrap();
    assert_eq!(report.touched(), 0);
}

#[test]
fn from_profile_runs_the_same_pipeline() {
    let dir = TempDir::new().unwrap();
    let profile = ddl_meta::Profile {
        platform: "snowflake".to_string(),
        ddl_root: dir.path().to_path_buf(),
        account: Some("xy12345".into()),
        username: Some("extractor".into()),
        database: Some("ANALYTICS".into()),
        schema: Some("PUBLIC".into()),
        warehouse: Some("COMPUTE_WH".into()),
        role: None,
        git_author_name: Some("DDL Bot".into()),
        git_author_email: Some("ddl-bot@example.com".into()),
        auto_push: false,
    };

    let engine = SyncEngine::from_profile(&profile, Box::new(baseline_session())).unwrap();
    let request = ddl_core::commit_request_from_profile(&profile, false);
    let report = engine
        .sync(&ExecuteOptions {
            dry_run: false,
            commit: Some(request),
        })
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.created.len(), 2);

    let repo = git2::Repository::open(dir.path()).unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.author().name(), Some("DDL Bot"));
}

#[test]
fn concurrent_run_is_rejected_by_the_lock() {
    let dir = TempDir::new().unwrap();
    let root = NormalizedPath::new(dir.path());
    let _held = ddl_fs::RunLock::acquire(&root).unwrap();

    let result = engine(dir.path(), baseline_session()).sync(&ExecuteOptions::default());
    assert!(result.is_err());

    // No partial state from the rejected run.
    assert!(!dir.path().join("analytics").exists());
}

#[test]
fn identity_is_recovered_from_the_tree_layout() {
    let dir = TempDir::new().unwrap();
    engine(dir.path(), baseline_session())
        .sync(&ExecuteOptions::default())
        .unwrap();

    let on_disk = engine(dir.path(), MockSession::new())
        .load_disk_inventory()
        .unwrap();

    // Disk identities carry the sanitized lowercase path segments.
    let view = identity(
        &Scope::new("analytics", "public"),
        ObjectType::View,
        "active_customers",
    );
    let entry = on_disk.get(&view).expect("view entry recovered from path");
    assert_eq!(
        entry.rel_path.as_str(),
        "analytics/public/views/active_customers.sql"
    );
    assert!(entry.fingerprint.starts_with("sha256:"));
}
