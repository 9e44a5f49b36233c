//! Core sync pipeline for ddlrepo
//!
//! Sits above the leaf crates and below the CLI:
//!
//! ```text
//!                 ddl-cli
//!                    |
//!                 ddl-core
//!                    |
//!     +--------+-----+------+---------+
//!     |        |            |         |
//!  ddl-fs  ddl-warehouse  ddl-git  ddl-meta
//! ```
//!
//! Provides the inventory model, the pure sync planner, the best-effort
//! executor, and the [`SyncEngine`] that runs the whole pipeline under a
//! run-scoped lock.

pub mod engine;
pub mod error;
pub mod execute;
pub mod inventory;
pub mod plan;

pub use engine::{Extraction, SyncEngine, commit_request_from_profile};
pub use error::{Error, Result};
pub use execute::{
    ActionError, CommitOutcome, CommitRequest, ExecuteOptions, SyncReport, apply_plan,
    summary_message,
};
pub use inventory::{FileEntry, Inventory, load_disk_inventory};
pub use plan::{SyncAction, SyncPlan, compute_plan, derive_rel_path};
