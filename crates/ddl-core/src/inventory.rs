//! Inventory model
//!
//! An inventory is a complete snapshot of known objects at a point in time,
//! keyed by identity. One side comes from the warehouse (reconstructed
//! DDL), the other from the on-disk tree (file entries). Inventories are
//! built fresh each run and never mutated in place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ddl_fs::NormalizedPath;
use ddl_warehouse::{ObjectIdentity, ObjectType, Platform};

use crate::error::{Error, Result};

/// On-disk counterpart of a reconstructed object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path relative to the tree root
    pub rel_path: NormalizedPath,
    pub content: String,
    /// `sha256:<hex>` of the normalized content
    pub fingerprint: String,
}

/// Snapshot of objects keyed by identity. Duplicate identities are a
/// structural error, never a silent overwrite.
#[derive(Debug, Clone, Default)]
pub struct Inventory<T> {
    entries: BTreeMap<ObjectIdentity, T>,
}

impl<T> Inventory<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert an entry; a duplicate identity is an error.
    pub fn insert(&mut self, identity: ObjectIdentity, value: T) -> Result<()> {
        if self.entries.contains_key(&identity) {
            return Err(Error::DuplicateIdentity { identity });
        }
        self.entries.insert(identity, value);
        Ok(())
    }

    pub fn get(&self, identity: &ObjectIdentity) -> Option<&T> {
        self.entries.get(identity)
    }

    pub fn contains(&self, identity: &ObjectIdentity) -> bool {
        self.entries.contains_key(identity)
    }

    /// Identity-ordered iteration.
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectIdentity, &T)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load the on-disk inventory by scanning the DDL tree under `root`.
///
/// Identities are recovered from the sanitized path segments; directories
/// that are not a known object-type segment are ignored with a warning
/// (they are not ours to manage).
pub fn load_disk_inventory(
    root: &NormalizedPath,
    platform: Platform,
) -> Result<Inventory<FileEntry>> {
    let mut inventory = Inventory::new();

    for entry in ddl_fs::scan_tree(root)? {
        let Some(object_type) = ObjectType::from_plural_dir(&entry.type_dir) else {
            tracing::warn!(path = %entry.rel_path, "unknown object-type directory; ignoring");
            continue;
        };

        let content = ddl_fs::io::read_text(&root.join(entry.rel_path.as_str()))?;
        let fingerprint = ddl_fs::fingerprint_ddl(&content);

        let identity = ObjectIdentity {
            platform,
            database: entry.database.clone(),
            schema: entry.schema.clone(),
            object_type,
            name: entry.object_name.clone(),
        };

        inventory.insert(
            identity,
            FileEntry {
                rel_path: entry.rel_path,
                content,
                fingerprint,
            },
        )?;
    }

    Ok(inventory)
}
