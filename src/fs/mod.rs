//! Filesystem utilities for fslocker.
//!
//! Atomic writes plus the lock-guarded single-writer update built on them.
//! These are the typical consumers of [`crate::locks::Locker`].

pub mod atomic;
mod store;

pub use atomic::atomic_write;
pub use store::{lock_path_for, locked_write};
