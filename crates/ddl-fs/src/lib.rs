//! Filesystem layer for ddlrepo
//!
//! Provides the DDL tree layout, content fingerprints, atomic I/O, and the
//! run-scoped lock that serializes sync runs against one tree root.

pub mod checksum;
pub mod error;
pub mod io;
pub mod layout;
pub mod lock;
pub mod path;

pub use checksum::{fingerprint_content, fingerprint_ddl, fingerprint_file, normalize_text};
pub use error::{Error, Result};
pub use layout::{DDL_EXTENSION, TreeEntry, ddl_rel_path, sanitize_segment, scan_tree};
pub use lock::{LOCK_FILE_NAME, RunLock};
pub use path::NormalizedPath;
