//! Error types for ddl-warehouse

use crate::record::ObjectIdentity;

/// Result type for ddl-warehouse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by a warehouse session collaborator.
///
/// Per-object variants are recoverable: the extractor records a skip and
/// continues the batch. Only batch-level failures (a listing query that
/// cannot run at all) abort extraction.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Object disappeared between listing and detail fetch
    #[error("Object {identity} no longer exists")]
    ObjectNotFound { identity: ObjectIdentity },

    /// Insufficient privilege on a single object
    #[error("Insufficient privilege to read {identity}")]
    PermissionDenied { identity: ObjectIdentity },

    /// Query-level failure reported by the platform
    #[error("Warehouse query failed: {message}")]
    Query { message: String },

    /// No session implementation is bundled for the platform
    #[error("No warehouse driver available for platform '{platform}'")]
    Unsupported { platform: String },
}

/// Errors that can occur in extraction and reconstruction
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Unknown object type: {value}")]
    UnknownObjectType { value: String },

    #[error("Unknown platform: {value}")]
    UnknownPlatform { value: String },
}
