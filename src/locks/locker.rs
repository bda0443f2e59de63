//! The path-bound locker state machine.

use super::backend::{LockBackend, PlatformBackend};
use crate::error::{LockError, Result};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// An exclusive, cross-process lock identified by a path on disk.
///
/// Construction does no I/O. The lock file is created on the first acquire
/// attempt (its parent directory must already exist) and is never written,
/// truncated, or removed.
///
/// ```text
///          lock / try_lock
/// Unlocked ───────────────► Locked
///    ▲                        │
///    └──────── unlock ────────┘
/// ```
///
/// Mutating operations take `&mut self`: one instance has one owner. Threads
/// that want to contend for the same path should each build their own
/// `Locker`; they then exclude each other exactly like separate processes.
///
/// A `Locker` dropped while locked releases its lock.
#[derive(Debug)]
pub struct Locker<B: LockBackend = PlatformBackend> {
    path: PathBuf,
    file: Option<File>,
    locked: bool,
    backend: PhantomData<fn() -> B>,
}

impl Locker {
    /// Create an unlocked locker for `path` using the platform backend.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_backend(path)
    }
}

impl<B: LockBackend> Locker<B> {
    /// Create an unlocked locker for `path` using backend `B`.
    pub fn with_backend(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
            locked: false,
            backend: PhantomData,
        }
    }

    /// The path this locker is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this instance currently holds its lock.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Block until the exclusive lock is held.
    ///
    /// There is no timeout: if the current holder never releases, this never
    /// returns. See [`Locker::lock_timeout`] for a bounded wait.
    ///
    /// # Errors
    ///
    /// * `LockError::AlreadyHeld` - this instance is already locked (no I/O done)
    /// * `LockError::Open` - the lock file could not be opened or created
    /// * `LockError::Acquire` - the kernel refused the lock
    pub fn lock(&mut self) -> Result<()> {
        self.ensure_unlocked()?;
        let file = self.open()?;

        debug!(path = %self.path.display(), "waiting for exclusive lock");
        B::lock_exclusive(&file).map_err(|source| LockError::Acquire {
            path: self.path.clone(),
            source,
        })?;

        self.hold(file);
        Ok(())
    }

    /// Try to take the exclusive lock without blocking.
    ///
    /// Returns `Ok(false)` when another holder has the lock; contention is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Same as [`Locker::lock`].
    pub fn try_lock(&mut self) -> Result<bool> {
        self.ensure_unlocked()?;
        let file = self.open()?;

        match B::try_lock_exclusive(&file) {
            Ok(true) => {
                self.hold(file);
                Ok(true)
            }
            Ok(false) => {
                trace!(path = %self.path.display(), "lock is held elsewhere");
                Ok(false)
            }
            Err(source) => Err(LockError::Acquire {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Release the lock and close the handle.
    ///
    /// Release and close are both attempted. If both fail, the release error
    /// is the one reported. The instance is unlocked afterwards in every case
    /// except `NotHeld`.
    ///
    /// # Errors
    ///
    /// * `LockError::NotHeld` - this instance is not locked (no I/O done)
    /// * `LockError::HandleMissing` - the flag was set without a handle
    /// * `LockError::Release` - unlocking or closing failed
    pub fn unlock(&mut self) -> Result<()> {
        if !self.locked {
            return Err(LockError::NotHeld {
                path: self.path.clone(),
            });
        }
        self.locked = false;

        let Some(file) = self.file.take() else {
            return Err(LockError::HandleMissing {
                path: self.path.clone(),
            });
        };

        let released = B::unlock(&file);
        let closed = B::close(file);
        match (released, closed) {
            (Ok(()), Ok(())) => {
                debug!(path = %self.path.display(), "released lock");
                Ok(())
            }
            (Err(source), _) | (Ok(()), Err(source)) => Err(LockError::Release {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.locked {
            return Err(LockError::AlreadyHeld {
                path: self.path.clone(),
            });
        }
        Ok(())
    }

    fn open(&self) -> Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|source| LockError::Open {
                path: self.path.clone(),
                source,
            })
    }

    fn hold(&mut self, file: File) {
        self.file = Some(file);
        self.locked = true;
        debug!(path = %self.path.display(), "acquired lock");
    }
}

impl<B: LockBackend> fmt::Display for Locker<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{path: {}, status: {}}}",
            self.path.display(),
            if self.locked { "locked" } else { "unlocked" }
        )
    }
}

impl<B: LockBackend> Drop for Locker<B> {
    fn drop(&mut self) {
        if self.locked
            && let Err(e) = self.unlock()
        {
            warn!(path = %self.path.display(), error = %e, "failed to release lock on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_handle_clears_flag_and_reports() {
        let temp_dir = TempDir::new().unwrap();
        let mut locker = Locker::new(temp_dir.path().join("a.lock"));
        locker.lock().unwrap();

        // Simulate the flag and handle drifting apart.
        drop(locker.file.take());

        let err = locker.unlock().unwrap_err();
        assert!(matches!(err, LockError::HandleMissing { .. }));
        assert!(!locker.is_locked());
    }

    #[test]
    fn flag_tracks_handle() {
        let temp_dir = TempDir::new().unwrap();
        let mut locker = Locker::new(temp_dir.path().join("a.lock"));
        assert!(locker.file.is_none());

        locker.lock().unwrap();
        assert!(locker.is_locked());
        assert!(locker.file.is_some());

        locker.unlock().unwrap();
        assert!(!locker.is_locked());
        assert!(locker.file.is_none());
    }
}
