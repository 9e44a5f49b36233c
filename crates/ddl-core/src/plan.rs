//! Sync planner
//!
//! Diffs the warehouse-side and disk-side inventories into an ordered,
//! side-effect-free action list. Computing a plan never touches the
//! filesystem or version control, so a dry run is the same computation with
//! the executor disarmed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ddl_fs::NormalizedPath;
use ddl_warehouse::{ObjectIdentity, ReconstructedDdl};

use crate::error::{Error, Result};
use crate::inventory::{FileEntry, Inventory};

/// One planned file-tree mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncAction {
    Create {
        identity: ObjectIdentity,
        rel_path: NormalizedPath,
        content: String,
    },
    Update {
        identity: ObjectIdentity,
        rel_path: NormalizedPath,
        content: String,
    },
    Delete {
        identity: ObjectIdentity,
        rel_path: NormalizedPath,
    },
}

impl SyncAction {
    pub fn identity(&self) -> &ObjectIdentity {
        match self {
            SyncAction::Create { identity, .. }
            | SyncAction::Update { identity, .. }
            | SyncAction::Delete { identity, .. } => identity,
        }
    }

    pub fn rel_path(&self) -> &NormalizedPath {
        match self {
            SyncAction::Create { rel_path, .. }
            | SyncAction::Update { rel_path, .. }
            | SyncAction::Delete { rel_path, .. } => rel_path,
        }
    }
}

/// Ordered action list: Creates and Updates before Deletes, so a failure
/// partway through never leaves a destructive-looking working tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncPlan {
    pub actions: Vec<SyncAction>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn creates(&self) -> impl Iterator<Item = &SyncAction> {
        self.actions
            .iter()
            .filter(|a| matches!(a, SyncAction::Create { .. }))
    }

    pub fn updates(&self) -> impl Iterator<Item = &SyncAction> {
        self.actions
            .iter()
            .filter(|a| matches!(a, SyncAction::Update { .. }))
    }

    pub fn deletes(&self) -> impl Iterator<Item = &SyncAction> {
        self.actions
            .iter()
            .filter(|a| matches!(a, SyncAction::Delete { .. }))
    }
}

/// Derive the relative tree path for an identity.
///
/// Total and, per plan, injective: a collision between two identities is
/// detected by [`compute_plan`] and raised, never silently overwritten.
pub fn derive_rel_path(identity: &ObjectIdentity) -> Result<NormalizedPath> {
    Ok(ddl_fs::ddl_rel_path(
        &identity.database,
        &identity.schema,
        identity.object_type.plural_dir(),
        &identity.name,
    )?)
}

/// Compute the minimal action list reconciling `on_disk` with `current`.
///
/// Pure function of the two inventories. The join key is the derived
/// relative path; identity comparison is exact, so a renamed object plans as
/// a Delete plus a Create.
pub fn compute_plan(
    current: &Inventory<ReconstructedDdl>,
    on_disk: &Inventory<FileEntry>,
) -> Result<SyncPlan> {
    let mut current_by_path: BTreeMap<NormalizedPath, (&ObjectIdentity, &ReconstructedDdl)> =
        BTreeMap::new();
    for (identity, ddl) in current.iter() {
        let rel_path = derive_rel_path(identity)?;
        if let Some((first, _)) = current_by_path.get(&rel_path) {
            return Err(Error::PathCollision {
                path: rel_path.to_string(),
                first: (*first).clone(),
                second: identity.clone(),
            });
        }
        current_by_path.insert(rel_path, (identity, ddl));
    }

    let mut disk_by_path: BTreeMap<&NormalizedPath, (&ObjectIdentity, &FileEntry)> =
        BTreeMap::new();
    for (identity, entry) in on_disk.iter() {
        disk_by_path.insert(&entry.rel_path, (identity, entry));
    }

    let mut creates = Vec::new();
    let mut updates = Vec::new();
    let mut deletes = Vec::new();

    for (rel_path, (identity, ddl)) in &current_by_path {
        match disk_by_path.get(rel_path) {
            None => creates.push(SyncAction::Create {
                identity: (*identity).clone(),
                rel_path: rel_path.clone(),
                content: ddl.text.clone(),
            }),
            Some((_, entry)) if entry.fingerprint != ddl.fingerprint => {
                updates.push(SyncAction::Update {
                    identity: (*identity).clone(),
                    rel_path: rel_path.clone(),
                    content: ddl.text.clone(),
                });
            }
            Some(_) => {} // unchanged
        }
    }

    for (rel_path, (identity, _)) in &disk_by_path {
        if !current_by_path.contains_key(rel_path) {
            deletes.push(SyncAction::Delete {
                identity: (*identity).clone(),
                rel_path: (*rel_path).clone(),
            });
        }
    }

    // BTreeMap iteration already sorted each group by path.
    let mut actions = creates;
    actions.extend(updates);
    actions.extend(deletes);

    Ok(SyncPlan { actions })
}
