//! Run-scoped lock on a DDL tree root
//!
//! Only one sync run may execute against a given root at a time; interleaved
//! file writes with concurrent planning would corrupt the on-disk inventory
//! snapshot. The lock is advisory (fs2) and held for the lifetime of the
//! guard.

use std::fs::{self, OpenOptions};

use fs2::FileExt;

use crate::error::{Error, Result};
use crate::path::NormalizedPath;

/// Name of the lock file created directly under the tree root
pub const LOCK_FILE_NAME: &str = ".ddlrepo.lock";

/// Exclusive lock over a DDL tree root, released on drop.
#[derive(Debug)]
pub struct RunLock {
    file: std::fs::File,
    path: NormalizedPath,
}

impl RunLock {
    /// Acquire the run lock for `root`, creating the root if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockHeld`] if another run already holds the lock,
    /// or an I/O error if the lock file cannot be created.
    pub fn acquire(root: &NormalizedPath) -> Result<Self> {
        let native_root = root.to_native();
        fs::create_dir_all(&native_root).map_err(|e| Error::io(&native_root, e))?;

        let path = root.join(LOCK_FILE_NAME);
        let native_path = path.to_native();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&native_path)
            .map_err(|e| Error::io(&native_path, e))?;

        file.try_lock_exclusive().map_err(|_| Error::LockHeld {
            path: native_path.clone(),
        })?;

        tracing::debug!(root = %root, "acquired run lock");
        Ok(Self { file, path })
    }

    /// Path of the lock file.
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        // Advisory lock is released with the descriptor either way.
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_held() {
        let dir = tempfile::tempdir().unwrap();
        let root = NormalizedPath::new(dir.path());

        let _held = RunLock::acquire(&root).unwrap();
        let second = RunLock::acquire(&root);
        assert!(matches!(second, Err(Error::LockHeld { .. })));
    }

    #[test]
    fn lock_is_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let root = NormalizedPath::new(dir.path());

        drop(RunLock::acquire(&root).unwrap());
        assert!(RunLock::acquire(&root).is_ok());
    }

    #[test]
    fn acquire_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = NormalizedPath::new(dir.path().join("fresh"));

        let lock = RunLock::acquire(&root).unwrap();
        assert!(lock.path().exists());
    }
}
