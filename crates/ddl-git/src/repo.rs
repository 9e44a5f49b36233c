//! Commit and status operations on the DDL tree repository
//!
//! The file tree is the source of truth; version control is a downstream
//! recorder. Every operation here can fail without undoing file writes.

use std::collections::BTreeSet;
use std::path::Path;

use git2::{IndexAddOption, Repository, Signature, StatusOptions};

use ddl_fs::{LOCK_FILE_NAME, NormalizedPath};

use crate::error::{Error, Result};

/// Author identity used for generated commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

impl Default for CommitAuthor {
    fn default() -> Self {
        Self {
            name: "ddlrepo".to_string(),
            email: "ddlrepo@localhost".to_string(),
        }
    }
}

/// Open the repository at `root`, initializing one if none exists.
pub fn open_or_init(root: &NormalizedPath) -> Result<Repository> {
    let native = root.to_native();
    match Repository::open(&native) {
        Ok(repo) => Ok(repo),
        Err(_) => {
            tracing::debug!(root = %root, "initializing git repository");
            Ok(Repository::init(&native)?)
        }
    }
}

/// Open the repository at `root`; a missing repository is an error.
pub fn open(root: &NormalizedPath) -> Result<Repository> {
    Repository::open(root.to_native()).map_err(|_| Error::NotARepository {
        path: root.to_string(),
    })
}

/// Workdir-relative paths with uncommitted changes (index or worktree).
///
/// The sync run-lock file is never content and is excluded.
pub fn dirty_paths(root: &NormalizedPath) -> Result<BTreeSet<String>> {
    let repo = open(root)?;
    let mut options = StatusOptions::new();
    options.include_untracked(true).recurse_untracked_dirs(true);

    let statuses = repo.statuses(Some(&mut options))?;
    let mut paths = BTreeSet::new();
    for entry in statuses.iter() {
        if let Some(path) = entry.path()
            && path != LOCK_FILE_NAME
        {
            paths.insert(path.to_string());
        }
    }
    Ok(paths)
}

/// Stage the given workdir-relative paths and commit them in one commit.
///
/// Deleted paths are removed from the index; everything else is added.
/// Returns the new commit id as hex. Called exactly once per sync run, with
/// the full set of touched paths.
pub fn commit_paths(
    root: &NormalizedPath,
    paths: &BTreeSet<String>,
    message: &str,
    author: &CommitAuthor,
) -> Result<String> {
    let repo = open_or_init(root)?;
    let mut index = repo.index()?;

    for rel in paths {
        let rel_path = Path::new(rel);
        if root.join(rel).exists() {
            index.add_path(rel_path).map_err(|e| Error::CommitFailed {
                message: format!("failed to stage {rel}: {}", e.message()),
            })?;
        } else {
            index
                .remove_path(rel_path)
                .map_err(|e| Error::CommitFailed {
                    message: format!("failed to stage deletion of {rel}: {}", e.message()),
                })?;
        }
    }
    index.write()?;

    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;

    let signature =
        Signature::now(&author.name, &author.email).map_err(|e| Error::CommitFailed {
            message: format!("invalid author signature: {}", e.message()),
        })?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(_) => None, // unborn branch, first commit
    };
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    let oid = repo
        .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .map_err(|e| Error::CommitFailed {
            message: e.message().to_string(),
        })?;

    Ok(oid.to_string())
}

/// Stage everything under the root and commit. Used by `init` to capture a
/// pre-existing tree in one baseline commit.
pub fn commit_all(
    root: &NormalizedPath,
    message: &str,
    author: &CommitAuthor,
) -> Result<String> {
    let repo = open_or_init(root)?;
    let mut index = repo.index()?;
    index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
    // add_all may have picked up the run-lock file; it is never content.
    let _ = index.remove_path(Path::new(LOCK_FILE_NAME));
    index.write()?;

    let mut paths = BTreeSet::new();
    for entry in index.iter() {
        let path = String::from_utf8_lossy(&entry.path).to_string();
        if path != LOCK_FILE_NAME {
            paths.insert(path);
        }
    }
    drop(index);
    commit_paths(root, &paths, message, author)
}

/// Push a branch to a remote. Defaults: `origin`, current branch.
pub fn push(root: &NormalizedPath, remote: Option<&str>, branch: Option<&str>) -> Result<()> {
    let repo = open(root)?;
    let remote_name = remote.unwrap_or("origin");

    let branch_name = match branch {
        Some(b) => b.to_string(),
        None => {
            let head = repo.head()?;
            head.shorthand().unwrap_or("HEAD").to_string()
        }
    };

    let mut remote = repo
        .find_remote(remote_name)
        .map_err(|_| Error::RemoteNotFound {
            name: remote_name.to_string(),
        })?;

    let refspec = format!("refs/heads/{branch_name}:refs/heads/{branch_name}");
    remote.push(&[&refspec], None).map_err(|e| Error::PushFailed {
        message: e.message().to_string(),
    })?;

    Ok(())
}
