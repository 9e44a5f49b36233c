//! Version-control collaborator for ddlrepo
//!
//! Thin `git2` wrapper over the operations the sync executor needs: commit
//! a set of touched paths, report dirty paths, push. Failures are reported
//! to the caller and never roll back file writes.

pub mod error;
pub mod repo;

pub use error::{Error, Result};
pub use repo::{CommitAuthor, commit_all, commit_paths, dirty_paths, open, open_or_init, push};
