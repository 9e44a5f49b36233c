//! Sync executor
//!
//! Applies a plan to the file tree. Best-effort, fully reported: a single
//! action's failure is recorded and the remaining actions still run,
//! because a partial sync that captured most objects is strictly more
//! useful than none. Commit happens once, after all file operations, and a
//! commit failure never rolls back written files.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use ddl_fs::NormalizedPath;
use ddl_git::CommitAuthor;
use ddl_warehouse::{ObjectIdentity, SkippedObject};

use crate::plan::{SyncAction, SyncPlan};

/// Commit behavior requested for a run.
#[derive(Debug, Clone, Default)]
pub struct CommitRequest {
    pub author: CommitAuthor,
    /// Override for the generated summary message
    pub message: Option<String>,
    /// Push the branch after a successful commit
    pub push: bool,
}

/// Options for applying a plan.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Simulate: report what would happen, touch nothing
    pub dry_run: bool,
    /// Commit touched paths after file operations
    pub commit: Option<CommitRequest>,
}

/// One action that failed during apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionError {
    pub rel_path: NormalizedPath,
    pub message: String,
}

/// What happened to the requested commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommitOutcome {
    Committed { id: String },
    CommitFailed { message: String },
    PushFailed { id: String, message: String },
}

/// Report every run ends with: successes, skips, and failures by identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    /// Whether this report came from a dry run
    pub dry_run: bool,
    pub created: Vec<NormalizedPath>,
    pub updated: Vec<NormalizedPath>,
    pub deleted: Vec<NormalizedPath>,
    /// Objects skipped during extraction
    pub skipped: Vec<SkippedObject>,
    /// Objects whose reconstruction was best-effort, not re-executable
    pub incomplete: Vec<ObjectIdentity>,
    /// Per-action failures; never abort the run
    pub errors: Vec<ActionError>,
    pub commit: Option<CommitOutcome>,
}

impl SyncReport {
    /// True when nothing failed, including the commit.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
            && !matches!(
                self.commit,
                Some(CommitOutcome::CommitFailed { .. }) | Some(CommitOutcome::PushFailed { .. })
            )
    }

    pub fn touched(&self) -> usize {
        self.created.len() + self.updated.len() + self.deleted.len()
    }
}

/// Generate the one-line commit summary for a report.
pub fn summary_message(report: &SyncReport) -> String {
    format!(
        "Sync DDL: {} created, {} updated, {} deleted ({} UTC)",
        report.created.len(),
        report.updated.len(),
        report.deleted.len(),
        Utc::now().format("%Y-%m-%d %H:%M")
    )
}

/// Apply a plan to the tree under `root`.
///
/// In dry-run mode only the report is produced. Otherwise each action runs
/// in plan order, failures are captured per action, and the commit
/// collaborator is invoked exactly once afterwards if requested.
pub fn apply_plan(root: &NormalizedPath, plan: &SyncPlan, options: &ExecuteOptions) -> SyncReport {
    let mut report = SyncReport {
        dry_run: options.dry_run,
        ..SyncReport::default()
    };
    let mut touched: BTreeSet<String> = BTreeSet::new();

    for action in &plan.actions {
        if options.dry_run {
            record_action(&mut report, action);
            continue;
        }

        let result = match action {
            SyncAction::Create { rel_path, content, .. }
            | SyncAction::Update { rel_path, content, .. } => {
                ddl_fs::io::write_text(&root.join(rel_path.as_str()), content)
            }
            SyncAction::Delete { rel_path, .. } => {
                ddl_fs::io::remove_file(root, &root.join(rel_path.as_str()))
            }
        };

        match result {
            Ok(()) => {
                tracing::debug!(path = %action.rel_path(), "applied action");
                record_action(&mut report, action);
                touched.insert(action.rel_path().as_str().to_string());
            }
            Err(e) => {
                tracing::warn!(path = %action.rel_path(), error = %e, "action failed");
                report.errors.push(ActionError {
                    rel_path: action.rel_path().clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    if options.dry_run {
        return report;
    }

    if let Some(request) = &options.commit {
        if touched.is_empty() {
            tracing::debug!("no paths touched; skipping commit");
        } else {
            let message = request
                .message
                .clone()
                .unwrap_or_else(|| summary_message(&report));
            report.commit = Some(run_commit(root, &touched, &message, request));
        }
    }

    report
}

fn record_action(report: &mut SyncReport, action: &SyncAction) {
    match action {
        SyncAction::Create { rel_path, .. } => report.created.push(rel_path.clone()),
        SyncAction::Update { rel_path, .. } => report.updated.push(rel_path.clone()),
        SyncAction::Delete { rel_path, .. } => report.deleted.push(rel_path.clone()),
    }
}

fn run_commit(
    root: &NormalizedPath,
    touched: &BTreeSet<String>,
    message: &str,
    request: &CommitRequest,
) -> CommitOutcome {
    let id = match ddl_git::commit_paths(root, touched, message, &request.author) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "commit failed; file tree left as written");
            return CommitOutcome::CommitFailed {
                message: e.to_string(),
            };
        }
    };

    if request.push {
        if let Err(e) = ddl_git::push(root, None, None) {
            tracing::warn!(error = %e, "push failed; commit stands");
            return CommitOutcome::PushFailed {
                id,
                message: e.to_string(),
            };
        }
    }

    CommitOutcome::Committed { id }
}
