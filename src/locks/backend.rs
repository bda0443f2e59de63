//! Platform lock backend contract.
//!
//! A backend knows how to take, test, and drop an exclusive kernel lock on an
//! already-open file. It holds no state of its own; the [`Locker`] owns the
//! handle and decides when to call into the backend.
//!
//! # Platform Semantics
//!
//! - **Unix** (`Flock`): advisory `flock(2)` on the whole file. Only
//!   processes that also take the lock are excluded; anyone else can still read
//!   and write the file.
//! - **Windows** (`RangeLock`): mandatory `LockFileEx` over the byte range
//!   `0..u64::MAX`. The OS rejects conflicting I/O on that range from every
//!   other handle.
//!
//! Portable callers must assume the weaker, advisory guarantee.
//!
//! [`Locker`]: super::Locker

use std::fs::File;
use std::io;

/// Exclusive-lock primitives over an open file handle.
pub trait LockBackend {
    /// Block the calling thread until an exclusive lock on `file` is held.
    ///
    /// Never reports contention; it waits instead.
    fn lock_exclusive(file: &File) -> io::Result<()>;

    /// Attempt an exclusive lock without blocking.
    ///
    /// Returns `Ok(false)` when another holder has the lock.
    fn try_lock_exclusive(file: &File) -> io::Result<bool>;

    /// Release a lock previously taken on `file`.
    fn unlock(file: &File) -> io::Result<()>;

    /// Close the handle, reporting failures that `Drop` would swallow.
    fn close(file: File) -> io::Result<()> {
        drop(file);
        Ok(())
    }
}

/// Backend for the current build target.
#[cfg(unix)]
pub type PlatformBackend = super::unix::Flock;

/// Backend for the current build target.
#[cfg(windows)]
pub type PlatformBackend = super::windows::RangeLock;

#[cfg(not(any(unix, windows)))]
compile_error!("fslocker only supports unix and windows targets");
