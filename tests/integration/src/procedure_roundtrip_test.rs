//! Stored procedures through the full pipeline
//!
//! Procedures are the objects most damaged by catalog extraction, so they
//! get their own end-to-end coverage: the escaped single-line form must
//! land on disk as readable multi-line DDL, and a second run against the
//! unchanged warehouse must not rewrite the file.

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use ddl_core::{ExecuteOptions, SyncEngine};
use ddl_fs::NormalizedPath;
use ddl_test_utils::session::{MockSession, identity, sql_procedure_record};
use ddl_warehouse::{ObjectType, Platform, RawObjectRecord, Scope, adapter_for, fields};

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

#[test]
fn escaped_body_lands_on_disk_as_multi_line_ddl() {
    let dir = TempDir::new().unwrap();
    let session = MockSession::new().with_record(sql_procedure_record(
        &scope(),
        "GET_CUSTOMER_ORDERS",
        "(CUSTOMER_ID_PARAM VARCHAR)",
        "VARCHAR",
        "DECLARE\\n  result VARCHAR;\\nBEGIN\\n  SELECT COUNT(*) INTO result FROM ORDERS;\\n  RETURN result;\\nEND;",
    ));

    let report = engine(dir.path(), session)
        .sync(&ExecuteOptions::default())
        .unwrap();
    assert!(report.is_clean());
    assert!(report.incomplete.is_empty());

    let written = std::fs::read_to_string(
        dir.path()
            .join("analytics/public/stored_procedures/get_customer_orders.sql"),
    )
    .unwrap();

    assert_eq!(
        written,
        "CREATE OR REPLACE PROCEDURE PUBLIC.GET_CUSTOMER_ORDERS(CUSTOMER_ID_PARAM VARCHAR)\n\
         RETURNS VARCHAR\n\
         LANGUAGE SQL\n\
         AS\n\
         $$\n\
         DECLARE\n\
         \x20 result VARCHAR;\n\
         BEGIN\n\
         \x20 SELECT COUNT(*) INTO result FROM ORDERS;\n\
         \x20 RETURN result;\n\
         END;\n\
         $$;\n"
    );
}

#[test]
fn unchanged_procedure_is_stable_across_runs() {
    let dir = TempDir::new().unwrap();
    let session = || {
        MockSession::new().with_record(sql_procedure_record(
            &scope(),
            "STABLE_PROC",
            "(N NUMBER)",
            "NUMBER",
            "BEGIN\\n  RETURN N + 1;\\nEND;",
        ))
    };

    engine(dir.path(), session())
        .sync(&ExecuteOptions::default())
        .unwrap();
    let report = engine(dir.path(), session())
        .sync(&ExecuteOptions::default())
        .unwrap();

    assert_eq!(report.touched(), 0);
}

#[test]
fn multi_line_catalog_body_is_not_unescaped_again() {
    let dir = TempDir::new().unwrap();
    // Body already literal, with a two-character \n inside a string literal
    // that must survive.
    let body = "BEGIN\n  RETURN 'line1\\nline2';\nEND;";
    let session = MockSession::new().with_record(sql_procedure_record(
        &scope(),
        "KEEP_ESCAPES",
        "()",
        "VARCHAR",
        body,
    ));

    engine(dir.path(), session)
        .sync(&ExecuteOptions::default())
        .unwrap();

    let written = std::fs::read_to_string(
        dir.path()
            .join("analytics/public/stored_procedures/keep_escapes.sql"),
    )
    .unwrap();
    assert!(written.contains("RETURN 'line1\\nline2';"));
}

#[test]
fn body_redefinition_plans_an_update() {
    let dir = TempDir::new().unwrap();
    let proc_id = identity(&scope(), ObjectType::StoredProcedure, "EVOLVING");
    let record = sql_procedure_record(&scope(), "EVOLVING", "()", "VARCHAR", "RETURN 'v1';");

    engine(dir.path(), MockSession::new().with_record(record.clone()))
        .sync(&ExecuteOptions::default())
        .unwrap();

    let mut changed = MockSession::new().with_record(record);
    changed.update_field(&proc_id, fields::BODY, "RETURN 'v2';");
    let report = engine(dir.path(), changed)
        .sync(&ExecuteOptions::default())
        .unwrap();

    assert_eq!(report.updated.len(), 1);
    let written = std::fs::read_to_string(
        dir.path().join("analytics/public/stored_procedures/evolving.sql"),
    )
    .unwrap();
    assert!(written.contains("RETURN 'v2';"));
}

#[test]
fn delimiter_in_body_is_written_but_reported_incomplete() {
    let dir = TempDir::new().unwrap();
    let session = MockSession::new().with_record(sql_procedure_record(
        &scope(),
        "DOLLAR_QUOTED",
        "()",
        "VARCHAR",
        "BEGIN\n  RETURN '$$';\nEND;",
    ));

    let report = engine(dir.path(), session)
        .sync(&ExecuteOptions::default())
        .unwrap();

    assert_eq!(report.created.len(), 1);
    assert_eq!(report.incomplete.len(), 1);
    assert_eq!(report.incomplete[0].name, "DOLLAR_QUOTED");
    assert!(dir
        .path()
        .join("analytics/public/stored_procedures/dollar_quoted.sql")
        .exists());
}

#[test]
fn sparse_catalog_record_degrades_to_best_effort_file() {
    let dir = TempDir::new().unwrap();
    let session = MockSession::new().with_record(
        RawObjectRecord::new(identity(&scope(), ObjectType::StoredProcedure, "LEGACY"))
            .with_field(fields::LANGUAGE, "SQL")
            .with_field(fields::BODY, "RETURN 1;"),
    );

    let report = engine(dir.path(), session)
        .sync(&ExecuteOptions::default())
        .unwrap();

    assert_eq!(report.incomplete.len(), 1);
    let written = std::fs::read_to_string(
        dir.path().join("analytics/public/stored_procedures/legacy.sql"),
    )
    .unwrap();
    assert!(written.starts_with("CREATE OR REPLACE PROCEDURE PUBLIC.LEGACY()"));
    assert!(written.contains("RETURN 1;"));
}
