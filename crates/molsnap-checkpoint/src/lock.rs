//! Advisory directory locks.
//!
//! A writer holds an exclusive lock on `<dir>/.molsnap.lock` for the
//! whole write; readers hold a shared one. Locks are taken without
//! blocking: contention is reported as an I/O error of kind
//! `WouldBlock` rather than waiting.
//!
//! fs2 methods are called through the trait path; newer std has
//! inherent `File` lock methods with the same names.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use molsnap_types::MolsnapResult;

/// Lock file name inside a checkpoint directory.
pub const LOCK_FILE_NAME: &str = ".molsnap.lock";

/// A held lock. Released on drop.
#[derive(Debug)]
pub struct DirLock {
    file: File,
    path: PathBuf,
}

impl DirLock {
    fn open(dir: &Path) -> MolsnapResult<(File, PathBuf)> {
        let path = dir.join(LOCK_FILE_NAME);
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)?;
        Ok((file, path))
    }

    /// Takes the exclusive (writer) lock.
    pub fn exclusive(dir: &Path) -> MolsnapResult<Self> {
        let (file, path) = Self::open(dir)?;
        FileExt::try_lock_exclusive(&file)?;
        tracing::trace!(path = %path.display(), "exclusive lock taken");
        Ok(Self { file, path })
    }

    /// Takes a shared (reader) lock.
    pub fn shared(dir: &Path) -> MolsnapResult<Self> {
        let (file, path) = Self::open(dir)?;
        FileExt::try_lock_shared(&file)?;
        tracing::trace!(path = %path.display(), "shared lock taken");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        // Closing the handle releases the lock as well.
        let _ = FileExt::unlock(&self.file);
    }
}
