//! Atomic I/O operations for the DDL tree

use std::fs::{self, OpenOptions};
use std::io::Write;

use fs2::FileExt;

use crate::error::{Error, Result};
use crate::path::NormalizedPath;

/// Write content atomically to a file.
///
/// Uses write-to-temp-then-rename so a failed run never leaves a partially
/// written DDL file behind. Creates parent directories as needed and holds
/// an advisory lock on the temp file while writing.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file in the same directory, so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))?;

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Remove a DDL file and prune any layout directories it leaves empty.
///
/// Pruning stops at the first non-empty ancestor or at `root`, so deleting
/// the last object of a schema removes the now-pointless
/// `database/schema/type/` directories as well.
pub fn remove_file(root: &NormalizedPath, path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    fs::remove_file(&native_path).map_err(|e| Error::io(&native_path, e))?;

    let mut current = path.parent();
    while let Some(dir) = current {
        if dir == *root || !dir.as_str().starts_with(root.as_str()) {
            break;
        }
        // Only empty directories are pruned; a read failure just stops pruning.
        match fs::remove_dir(dir.to_native()) {
            Ok(()) => current = dir.parent(),
            Err(_) => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("db/s/tables/orders.sql"));

        write_text(&path, "CREATE TABLE ORDERS ();\n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "CREATE TABLE ORDERS ();\n");
    }

    #[test]
    fn write_atomic_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("v.sql"));

        write_text(&path, "one\n").unwrap();
        write_text(&path, "two\n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "two\n");
    }

    #[test]
    fn remove_prunes_empty_layout_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = NormalizedPath::new(dir.path());
        let path = root.join("db").join("s").join("tables").join("orders.sql");

        write_text(&path, "x\n").unwrap();
        remove_file(&root, &path).unwrap();

        assert!(!dir.path().join("db").exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn remove_keeps_non_empty_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = NormalizedPath::new(dir.path());
        let a = root.join("db").join("s").join("tables").join("a.sql");
        let b = root.join("db").join("s").join("tables").join("b.sql");

        write_text(&a, "a\n").unwrap();
        write_text(&b, "b\n").unwrap();
        remove_file(&root, &a).unwrap();

        assert!(b.exists());
        assert!(dir.path().join("db/s/tables").exists());
    }
}
