//! Error types for ddl-git

/// Result type for ddl-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in version-control operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not a git repository: {path}")]
    NotARepository { path: String },

    #[error("Remote not found: {name}")]
    RemoteNotFound { name: String },

    #[error("Push failed: {message}")]
    PushFailed { message: String },

    #[error("Commit failed: {message}")]
    CommitFailed { message: String },

    #[error(transparent)]
    Git(#[from] git2::Error),
}
