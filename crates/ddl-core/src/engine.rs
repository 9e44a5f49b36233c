//! SyncEngine implementation
//!
//! Coordinates one sync run: extract the current inventory from the
//! warehouse, load the on-disk inventory, compute the plan, apply it. Runs
//! against one tree root are serialized with a run-scoped lock; planning
//! never starts against a partially populated inventory.

use ddl_fs::{NormalizedPath, RunLock};
use ddl_git::CommitAuthor;
use ddl_meta::Profile;
use ddl_warehouse::{
    PlatformAdapter, Platform, ReconstructedDdl, Scope, SkippedObject, WarehouseSession,
    adapter_for, extract_all,
};

use crate::error::Result;
use crate::execute::{CommitRequest, ExecuteOptions, SyncReport, apply_plan};
use crate::inventory::{FileEntry, Inventory, load_disk_inventory};
use crate::plan::{SyncPlan, compute_plan};

/// Warehouse-side inventory plus what extraction could not deliver.
#[derive(Debug)]
pub struct Extraction {
    pub inventory: Inventory<ReconstructedDdl>,
    pub skipped: Vec<SkippedObject>,
    /// Identities whose reconstruction is best-effort only
    pub incomplete: Vec<ddl_warehouse::ObjectIdentity>,
}

/// Engine for one (root, scope, platform) sync pipeline.
pub struct SyncEngine {
    root: NormalizedPath,
    scope: Scope,
    adapter: Box<dyn PlatformAdapter>,
    session: Box<dyn WarehouseSession>,
}

impl SyncEngine {
    pub fn new(
        root: NormalizedPath,
        scope: Scope,
        adapter: Box<dyn PlatformAdapter>,
        session: Box<dyn WarehouseSession>,
    ) -> Self {
        Self {
            root,
            scope,
            adapter,
            session,
        }
    }

    /// Build an engine from a validated profile and a live session.
    ///
    /// The profile is an explicit input; the engine holds everything a run
    /// needs, so a sync is reproducible from its inputs.
    pub fn from_profile(profile: &Profile, session: Box<dyn WarehouseSession>) -> Result<Self> {
        let platform: Platform = profile.platform.parse().map_err(ddl_warehouse::Error::from)?;
        let scope = Scope::new(
            profile.database.clone().unwrap_or_default(),
            profile.schema.clone().unwrap_or_default(),
        );
        Ok(Self::new(
            NormalizedPath::new(&profile.ddl_root),
            scope,
            adapter_for(platform),
            session,
        ))
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn platform(&self) -> Platform {
        self.adapter.platform()
    }

    /// Extract and reconstruct the full current inventory.
    ///
    /// Fully materialized before returning; a batch-level extraction
    /// failure (a listing that cannot run) is fatal and happens before any
    /// file mutation.
    pub fn build_current_inventory(&self) -> Result<Extraction> {
        let batch = extract_all(self.adapter.as_ref(), self.session.as_ref(), &self.scope)?;

        let mut inventory = Inventory::new();
        let mut incomplete = Vec::new();

        for record in &batch.records {
            let ddl = self.adapter.reconstruct(record)?;
            if !ddl.complete {
                tracing::warn!(identity = %ddl.identity, "best-effort reconstruction only");
                incomplete.push(ddl.identity.clone());
            }
            inventory.insert(ddl.identity.clone(), ddl)?;
        }

        Ok(Extraction {
            inventory,
            skipped: batch.skipped,
            incomplete,
        })
    }

    /// Load the on-disk inventory from the tree root.
    pub fn load_disk_inventory(&self) -> Result<Inventory<FileEntry>> {
        load_disk_inventory(&self.root, self.platform())
    }

    /// Pure planning step; see [`compute_plan`].
    pub fn compute_plan(
        &self,
        current: &Inventory<ReconstructedDdl>,
        on_disk: &Inventory<FileEntry>,
    ) -> Result<SyncPlan> {
        compute_plan(current, on_disk)
    }

    /// Apply a plan; see [`apply_plan`].
    pub fn apply_plan(&self, plan: &SyncPlan, options: &ExecuteOptions) -> SyncReport {
        apply_plan(&self.root, plan, options)
    }

    /// Run the whole pipeline under the run lock.
    ///
    /// Extraction failures abort before any file mutation; once application
    /// starts, per-action errors are recorded, not undone.
    pub fn sync(&self, options: &ExecuteOptions) -> Result<SyncReport> {
        let _lock = RunLock::acquire(&self.root)?;

        let extraction = self.build_current_inventory()?;
        let on_disk = self.load_disk_inventory()?;
        let plan = self.compute_plan(&extraction.inventory, &on_disk)?;

        tracing::debug!(
            creates = plan.creates().count(),
            updates = plan.updates().count(),
            deletes = plan.deletes().count(),
            "computed plan"
        );

        let mut report = self.apply_plan(&plan, options);
        report.skipped = extraction.skipped;
        report.incomplete = extraction.incomplete;
        Ok(report)
    }
}

/// Build the commit request a profile implies.
pub fn commit_request_from_profile(profile: &Profile, push: bool) -> CommitRequest {
    let author = match (&profile.git_author_name, &profile.git_author_email) {
        (Some(name), Some(email)) => CommitAuthor {
            name: name.clone(),
            email: email.clone(),
        },
        _ => CommitAuthor::default(),
    };
    CommitRequest {
        author,
        message: None,
        push: push || profile.auto_push,
    }
}
