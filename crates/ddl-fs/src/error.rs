//! Error types for ddl-fs

use std::path::PathBuf;

/// Result type for ddl-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ddl-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid object name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Path {path} is not a DDL tree path (expected database/schema/type/name.sql)")]
    MalformedTreePath { path: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Another sync run holds the lock on {path}")]
    LockHeld { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
