//! Single-writer data file updates.
//!
//! A data file `<name>` is guarded by the lock file `<name>.lock` next to it.
//! Every writer takes that lock before running the atomic temp-write-and-rename
//! sequence, so at most one process is inside the sequence at a time.

use super::atomic::atomic_write;
use crate::error::Result;
use crate::locks::with_lock;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lock file guarding `path`: the same path with `.lock` appended.
pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut lock = path.as_os_str().to_os_string();
    lock.push(".lock");
    lock.into()
}

/// Atomically replace `path` with `content` while holding `<path>.lock`.
///
/// Blocks until the lock is free. The lock file is left in place.
///
/// # Errors
///
/// * `LockError::Open` / `LockError::Acquire` - the guard lock could not be taken
/// * `LockError::Write` - the atomic write failed (the lock is still released)
/// * `LockError::Release` - the guard lock could not be released
pub fn locked_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let lock = lock_path_for(path);

    with_lock(&lock, || {
        debug!(path = %path.display(), bytes = content.len(), "writing under lock");
        atomic_write(path, content)
    })
}
