//! Error types for ddl-meta

use std::path::PathBuf;

/// Result type for ddl-meta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in profile configuration handling
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(String),

    #[error("Profile '{name}' does not exist")]
    ProfileNotFound { name: String },

    #[error("Invalid profile '{name}': {reason}")]
    ProfileInvalid { name: String, reason: String },

    #[error("Cannot delete active profile '{name}'; switch profiles first")]
    ActiveProfileDelete { name: String },

    #[error("No active profile configured; run `ddlrepo profile use <name>`")]
    NoActiveProfile,

    #[error("Could not determine home directory for default config path")]
    NoHomeDir,

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
