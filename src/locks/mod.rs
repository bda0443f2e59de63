//! Locking subsystem for fslocker.
//!
//! This module implements an exclusive lock shared between independent
//! processes through a file on disk:
//! - [`Locker`]: path-bound state machine with blocking, non-blocking, and
//!   bounded-wait acquisition
//! - [`LockBackend`]: the kernel primitives, one implementation per platform
//! - [`LockGuard`] / [`with_lock`]: scoped acquisition
//!
//! # Lock Files
//!
//! The lock file is created on first use and left on disk afterwards. Its
//! contents are never read or written; only its kernel lock state matters.
//! The parent directory must already exist.
//!
//! # Guarantees
//!
//! Exclusion is only guaranteed between parties that take the lock. On Unix
//! the lock is advisory and other processes may still touch the file; on
//! Windows it is mandatory over the whole file. Waiters are not served in any
//! particular order once the holder releases.
//!
//! # RAII Guards
//!
//! Guards release the lock when dropped. If release fails during drop, a
//! warning is logged but the program does not crash.

mod backend;
mod guard;
mod locker;
#[cfg(unix)]
mod unix;
mod wait;
#[cfg(windows)]
mod windows;


// Re-export public API
pub use backend::{LockBackend, PlatformBackend};
pub use guard::{LockGuard, with_lock};
pub use locker::Locker;
#[cfg(unix)]
pub use unix::Flock;
pub use wait::WaitOptions;
#[cfg(windows)]
pub use windows::RangeLock;
