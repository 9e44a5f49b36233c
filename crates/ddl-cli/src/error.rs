//! Error types for the ddlrepo CLI

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced to the user
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// User-facing problem with a ready-to-print message
    #[error("{0}")]
    User(String),

    #[error(transparent)]
    Meta(#[from] ddl_meta::Error),

    #[error(transparent)]
    Core(#[from] ddl_core::Error),

    #[error(transparent)]
    Git(#[from] ddl_git::Error),

    #[error(transparent)]
    Warehouse(#[from] ddl_warehouse::Error),

    #[error(transparent)]
    Fs(#[from] ddl_fs::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User(message.into())
    }
}
