use crate::prelude::*;
use fd_lock::{RwLock, RwLockWriteGuard};
use sha2::{Digest, Sha256};
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Targets with an update in progress, shared between processes.
///
/// Each target maps to a lock file in `dir`, named after the hash of the
/// target's canonical path. At most one update may hold a target's lock; the
/// lock is released when the guard is dropped or the process exits.
#[derive(Debug, Clone)]
pub struct InFlight {
    dir: PathBuf,
}

/// An open lock file for one target, not yet held.
#[derive(Debug)]
pub struct TargetLock {
    lock: RwLock<File>,
}

impl InFlight {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Lock directory under the user's cache dir.
    pub fn in_cache_dir() -> Result<Self> {
        let dir = dirs_next::cache_dir()
            .ok_or_else(|| eyre!("Unable to determine cache directory"))?
            .join("codemorph")
            .join("locks");

        Ok(Self::new(dir))
    }

    /// Open the lock file for `target`.
    pub fn slot(&self, target: &Path) -> Result<TargetLock> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| eyre!("Failed to create lock directory: {}", e))?;

        let key = normalize(target);
        let digest = Sha256::digest(key.to_string_lossy().as_bytes());
        let path = self.dir.join(format!("{:x}.lock", digest));

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .with_context(|| format!("Failed to open lock file {}", path.display()))?;

        Ok(TargetLock {
            lock: RwLock::new(file),
        })
    }
}

impl TargetLock {
    /// Claim the target without waiting. `None` if another update holds it.
    pub fn try_acquire(&mut self) -> Result<Option<RwLockWriteGuard<'_, File>>> {
        match self.lock.try_write() {
            Ok(guard) => Ok(Some(guard)),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e).context("Failed to lock target"),
        }
    }
}

/// Canonical form of `path` so `a.rs`, `./a.rs` and symlinks share a lock.
fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path).map(|p| p.components().collect()))
        .unwrap_or_else(|_| path.to_path_buf())
}
