//! Error types for ddl-core
//!
//! Only structural problems are fatal here: a path collision that makes the
//! plan unbuildable, a duplicate identity in one inventory, or a held run
//! lock. Per-object and per-action failures travel inside reports instead.

use ddl_warehouse::ObjectIdentity;

/// Result type for ddl-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ddl-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two distinct identities derived the same on-disk path; writing would
    /// silently overwrite one of them.
    #[error("Path collision at {path}: {first} and {second} both map to it")]
    PathCollision {
        path: String,
        first: ObjectIdentity,
        second: ObjectIdentity,
    },

    /// The same identity appeared twice while building one inventory.
    #[error("Duplicate identity in inventory: {identity}")]
    DuplicateIdentity { identity: ObjectIdentity },

    /// Filesystem error from ddl-fs
    #[error(transparent)]
    Fs(#[from] ddl_fs::Error),

    /// Extraction or reconstruction error from ddl-warehouse
    #[error(transparent)]
    Warehouse(#[from] ddl_warehouse::Error),

    /// Version-control error from ddl-git
    #[error(transparent)]
    Git(#[from] ddl_git::Error),

    /// Profile configuration error from ddl-meta
    #[error(transparent)]
    Meta(#[from] ddl_meta::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
