//! RAII lock guard implementation.

use super::backend::{LockBackend, PlatformBackend};
use super::locker::Locker;
use super::wait::WaitOptions;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// RAII guard for a held [`Locker`].
///
/// When dropped, the lock is released. If the release fails, a warning is
/// logged but no panic occurs.
#[derive(Debug)]
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a, B: LockBackend = PlatformBackend> {
    locker: &'a mut Locker<B>,

    /// Whether the lock has been released manually.
    released: bool,
}

impl<'a, B: LockBackend> LockGuard<'a, B> {
    fn new(locker: &'a mut Locker<B>) -> Self {
        Self {
            locker,
            released: false,
        }
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        self.locker.path()
    }

    /// Manually release the lock.
    ///
    /// Use this instead of dropping the guard when the release error matters.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.locker.unlock()
    }
}

impl<B: LockBackend> Drop for LockGuard<'_, B> {
    fn drop(&mut self) {
        if !self.released
            && self.locker.is_locked()
            && let Err(e) = self.locker.unlock()
        {
            warn!(path = %self.locker.path().display(), error = %e, "failed to release lock");
        }
    }
}

impl<B: LockBackend> Locker<B> {
    /// Block until locked and return a guard that unlocks on drop.
    pub fn acquire(&mut self) -> Result<LockGuard<'_, B>> {
        self.lock()?;
        Ok(LockGuard::new(self))
    }

    /// Non-blocking [`Locker::acquire`]. `Ok(None)` means contended.
    pub fn try_acquire(&mut self) -> Result<Option<LockGuard<'_, B>>> {
        if self.try_lock()? {
            Ok(Some(LockGuard::new(self)))
        } else {
            Ok(None)
        }
    }

    /// Bounded-wait [`Locker::acquire`] with default backoff.
    pub fn acquire_timeout(&mut self, timeout: Duration) -> Result<LockGuard<'_, B>> {
        self.acquire_timeout_with(timeout, &WaitOptions::default())
    }

    /// Bounded-wait [`Locker::acquire`] with explicit backoff settings.
    pub fn acquire_timeout_with(
        &mut self,
        timeout: Duration,
        options: &WaitOptions,
    ) -> Result<LockGuard<'_, B>> {
        self.lock_timeout_with(timeout, options)?;
        Ok(LockGuard::new(self))
    }
}

/// Run `f` while holding the lock at `path`.
///
/// The lock is released on every exit path, including when `f` returns an
/// error or panics. An error from `f` takes priority over a release error.
///
/// # Example
///
/// ```no_run
/// use fslocker::locks::with_lock;
///
/// let total = with_lock("/var/lib/app/state.lock", || Ok(40 + 2))?;
/// assert_eq!(total, 42);
/// # Ok::<(), fslocker::error::LockError>(())
/// ```
pub fn with_lock<P, T, F>(path: P, f: F) -> Result<T>
where
    P: Into<PathBuf>,
    F: FnOnce() -> Result<T>,
{
    let mut locker = Locker::new(path);
    let guard = locker.acquire()?;
    let outcome = f();
    let released = guard.release();
    let value = outcome?;
    released?;
    Ok(value)
}
