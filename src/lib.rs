//! fslocker: cross-process exclusive locking keyed by a path on disk.
//!
//! Independent processes coordinate access to a shared resource by taking an
//! exclusive kernel lock on a lock file. The core type is
//! [`locks::Locker`]; [`locks::LockGuard`] and [`locks::with_lock`] provide
//! scoped acquisition, and [`fs::locked_write`] shows the typical single-writer
//! use.
//!
//! ```no_run
//! use fslocker::locks::Locker;
//!
//! let mut locker = Locker::new("/var/lib/app/state.json.lock");
//! if locker.try_lock()? {
//!     // exclusive section
//!     locker.unlock()?;
//! }
//! # Ok::<(), fslocker::error::LockError>(())
//! ```

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod locks;

pub use error::{LockError, LockErrorKind, Result};
pub use locks::{LockGuard, Locker};
