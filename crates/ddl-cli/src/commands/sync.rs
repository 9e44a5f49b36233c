//! Init, diff, and sync command implementations

use colored::Colorize;
use similar::{ChangeTag, TextDiff};

use ddl_core::{
    CommitOutcome, ExecuteOptions, SyncAction, SyncEngine, SyncReport, commit_request_from_profile,
};
use ddl_fs::NormalizedPath;
use ddl_git::CommitAuthor;
use ddl_meta::Profile;
use ddl_warehouse::{SessionError, WarehouseSession};

use crate::context::Context;
use crate::error::{CliError, Result};

/// Open a live session for the profile's platform.
///
/// No warehouse driver ships with the CLI today; the session seam exists so
/// a driver crate (or an embedding application) can provide one. Everything
/// below the seam is exercised through in-memory sessions in tests.
fn open_session(profile: &Profile) -> Result<Box<dyn WarehouseSession>> {
    Err(ddl_warehouse::Error::from(SessionError::Unsupported {
        platform: profile.platform.clone(),
    })
    .into())
}

/// Run `ddlrepo init`.
pub fn run_init(ctx: &Context) -> Result<()> {
    let (name, profile) = ctx.profile()?;
    let root = NormalizedPath::new(&profile.ddl_root);

    std::fs::create_dir_all(root.to_native())?;
    ddl_git::open_or_init(&root)?;

    let author = author_from_profile(profile);
    let baseline_needed = !ddl_git::dirty_paths(&root)?.is_empty();
    if baseline_needed {
        let id = ddl_git::commit_all(&root, "Baseline DDL snapshot", &author)?;
        println!(
            "{} Initialized {} with baseline commit {}",
            "OK".green().bold(),
            root.as_str().cyan(),
            &id[..7]
        );
    } else {
        println!(
            "{} Initialized {} for profile '{}'",
            "OK".green().bold(),
            root.as_str().cyan(),
            name
        );
    }
    Ok(())
}

/// Run `ddlrepo diff`: a dry run with per-file previews.
pub fn run_diff(ctx: &Context) -> Result<()> {
    let (_, profile) = ctx.profile()?;
    let session = open_session(profile)?;
    let engine = SyncEngine::from_profile(profile, session)?;

    let extraction = engine.build_current_inventory()?;
    let on_disk = engine.load_disk_inventory()?;
    let plan = engine.compute_plan(&extraction.inventory, &on_disk)?;

    if plan.is_empty() {
        println!("{} Tree is up to date.", "OK".green().bold());
        return Ok(());
    }

    for action in &plan.actions {
        match action {
            SyncAction::Create { rel_path, .. } => {
                println!("{} {}", "create".green().bold(), rel_path);
            }
            SyncAction::Update { rel_path, content, .. } => {
                println!("{} {}", "update".yellow().bold(), rel_path);
                let old = ddl_fs::io::read_text(&engine.root().join(rel_path.as_str()))
                    .unwrap_or_default();
                print_text_diff(&old, content);
            }
            SyncAction::Delete { rel_path, .. } => {
                println!("{} {}", "delete".red().bold(), rel_path);
            }
        }
    }

    Ok(())
}

fn print_text_diff(old: &str, new: &str) {
    let diff = TextDiff::from_lines(old, new);
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Delete => print!("   {}", format!("-{change}").red()),
            ChangeTag::Insert => print!("   {}", format!("+{change}").green()),
            ChangeTag::Equal => {}
        }
    }
}

/// Run `ddlrepo sync`.
pub fn run_sync(
    ctx: &Context,
    dry_run: bool,
    no_commit: bool,
    push: bool,
    message: Option<String>,
    json_output: bool,
) -> Result<()> {
    let (_, profile) = ctx.profile()?;
    let session = open_session(profile)?;
    let engine = SyncEngine::from_profile(profile, session)?;

    let commit = if no_commit {
        None
    } else {
        let mut request = commit_request_from_profile(profile, push);
        request.message = message;
        Some(request)
    };

    let report = engine.sync(&ExecuteOptions { dry_run, commit })?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::user("sync finished with errors (see report)"))
    }
}

fn author_from_profile(profile: &Profile) -> CommitAuthor {
    match (&profile.git_author_name, &profile.git_author_email) {
        (Some(name), Some(email)) => CommitAuthor {
            name: name.clone(),
            email: email.clone(),
        },
        _ => CommitAuthor::default(),
    }
}

/// Print a run report the way every run ends: successes, skips, and
/// failures by identity, never a bare exit code.
pub fn print_report(report: &SyncReport) {
    let mode = if report.dry_run {
        " (dry run)".dimmed().to_string()
    } else {
        String::new()
    };
    println!(
        "{} {} created, {} updated, {} deleted{}",
        "=>".blue().bold(),
        report.created.len(),
        report.updated.len(),
        report.deleted.len(),
        mode
    );

    for path in &report.created {
        println!("   {} {}", "+".green(), path);
    }
    for path in &report.updated {
        println!("   {} {}", "~".yellow(), path);
    }
    for path in &report.deleted {
        println!("   {} {}", "-".red(), path);
    }

    if !report.skipped.is_empty() {
        println!("{} skipped:", "!".yellow().bold());
        for skip in &report.skipped {
            println!("   {} ({})", skip.identity, skip.reason.dimmed());
        }
    }

    if !report.incomplete.is_empty() {
        println!("{} incomplete reconstruction:", "!".yellow().bold());
        for identity in &report.incomplete {
            println!("   {identity}");
        }
    }

    if !report.errors.is_empty() {
        println!("{} errors:", "ERR".red().bold());
        for error in &report.errors {
            println!("   {} {}", error.rel_path.to_string().cyan(), error.message);
        }
    }

    match &report.commit {
        Some(CommitOutcome::Committed { id }) => {
            println!("{} committed {}", "OK".green().bold(), short_id(id));
        }
        Some(CommitOutcome::CommitFailed { message }) => {
            println!("{} commit failed: {message}", "ERR".red().bold());
        }
        Some(CommitOutcome::PushFailed { id, message }) => {
            println!(
                "{} committed {} but push failed: {message}",
                "!".yellow().bold(),
                short_id(id)
            );
        }
        None => {}
    }
}

fn short_id(id: &str) -> &str {
    &id[..7.min(id.len())]
}
