//! Error types for fslocker.
//!
//! Uses thiserror for derive macros. Every failure the locker can produce is
//! returned as a `LockError`; contention on a non-blocking attempt is not an
//! error and never shows up here.

use crate::exit_codes;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Coarse classification of a [`LockError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockErrorKind {
    /// The locker instance already holds its lock.
    AlreadyHeld,
    /// The locker instance does not hold its lock.
    NotHeld,
    /// The backing file could not be opened or created.
    OpenFailure,
    /// The kernel lock primitive failed for a reason other than contention.
    AcquireFailure,
    /// Releasing the kernel lock or closing the handle failed.
    ReleaseFailure,
    /// A bounded wait expired before the lock became available.
    Timeout,
    /// A guarded data write failed.
    WriteFailure,
    /// Configuration could not be read or is invalid.
    Config,
    /// A command run under the lock could not be started.
    Command,
}

/// Main error type for locker operations.
#[derive(Error, Debug)]
pub enum LockError {
    /// Lock or try_lock was called on an instance that is already locked.
    #[error("lock '{}' is already held by this process", path.display())]
    AlreadyHeld { path: PathBuf },

    /// Unlock was called on an instance that is not locked.
    #[error("lock '{}' is not held by this process", path.display())]
    NotHeld { path: PathBuf },

    /// The lock file could not be opened or created.
    #[error("failed to open lock file '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The kernel refused the lock for a reason other than contention.
    #[error("failed to acquire lock '{}': {source}", path.display())]
    Acquire {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Releasing the lock or closing its handle failed.
    #[error("failed to release lock '{}': {source}", path.display())]
    Release {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The locked flag was set but no file handle was present.
    #[error("lock '{}' was marked held but had no open handle", path.display())]
    HandleMissing { path: PathBuf },

    /// A bounded wait gave up.
    #[error("timed out after {waited:?} waiting for lock '{}'", path.display())]
    Timeout { path: PathBuf, waited: Duration },

    /// Writing a data file under the lock failed.
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file could not be read, parsed, or validated.
    #[error("config error: {0}")]
    Config(String),

    /// A child command could not be spawned or waited on.
    #[error("command failed: {0}")]
    Command(String),
}

impl LockError {
    /// Returns the taxonomy kind of this error.
    pub fn kind(&self) -> LockErrorKind {
        match self {
            LockError::AlreadyHeld { .. } => LockErrorKind::AlreadyHeld,
            LockError::NotHeld { .. } => LockErrorKind::NotHeld,
            LockError::Open { .. } => LockErrorKind::OpenFailure,
            LockError::Acquire { .. } => LockErrorKind::AcquireFailure,
            LockError::Release { .. } | LockError::HandleMissing { .. } => {
                LockErrorKind::ReleaseFailure
            }
            LockError::Timeout { .. } => LockErrorKind::Timeout,
            LockError::Write { .. } => LockErrorKind::WriteFailure,
            LockError::Config(_) => LockErrorKind::Config,
            LockError::Command(_) => LockErrorKind::Command,
        }
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            LockErrorKind::AlreadyHeld
            | LockErrorKind::NotHeld
            | LockErrorKind::Config
            | LockErrorKind::Command => exit_codes::USER_ERROR,
            LockErrorKind::Timeout => exit_codes::LOCK_CONTENDED,
            LockErrorKind::OpenFailure
            | LockErrorKind::AcquireFailure
            | LockErrorKind::ReleaseFailure
            | LockErrorKind::WriteFailure => exit_codes::IO_FAILURE,
        }
    }
}

/// Result type alias for locker operations.
pub type Result<T> = std::result::Result<T, LockError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn io_err() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "denied")
    }

    #[test]
    fn state_errors_have_user_exit_code() {
        let err = LockError::AlreadyHeld {
            path: PathBuf::from("a.lock"),
        };
        assert_eq!(err.kind(), LockErrorKind::AlreadyHeld);
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);

        let err = LockError::NotHeld {
            path: PathBuf::from("a.lock"),
        };
        assert_eq!(err.kind(), LockErrorKind::NotHeld);
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn io_errors_have_io_exit_code() {
        let path = PathBuf::from("a.lock");
        let errs = [
            LockError::Open {
                path: path.clone(),
                source: io_err(),
            },
            LockError::Acquire {
                path: path.clone(),
                source: io_err(),
            },
            LockError::Release {
                path: path.clone(),
                source: io_err(),
            },
            LockError::HandleMissing { path: path.clone() },
            LockError::Write {
                path,
                source: io_err(),
            },
        ];
        for err in &errs {
            assert_eq!(err.exit_code(), exit_codes::IO_FAILURE, "{err}");
        }
    }

    #[test]
    fn missing_handle_is_a_release_failure() {
        let err = LockError::HandleMissing {
            path: PathBuf::from("a.lock"),
        };
        assert_eq!(err.kind(), LockErrorKind::ReleaseFailure);
    }

    #[test]
    fn timeout_maps_to_contended() {
        let err = LockError::Timeout {
            path: PathBuf::from("a.lock"),
            waited: Duration::from_millis(50),
        };
        assert_eq!(err.exit_code(), exit_codes::LOCK_CONTENDED);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = LockError::AlreadyHeld {
            path: PathBuf::from("data.lock"),
        };
        assert_eq!(
            err.to_string(),
            "lock 'data.lock' is already held by this process"
        );

        let err = LockError::Open {
            path: PathBuf::from("missing/data.lock"),
            source: io_err(),
        };
        assert_eq!(
            err.to_string(),
            "failed to open lock file 'missing/data.lock': denied"
        );
    }

    #[test]
    fn io_source_is_preserved() {
        use std::error::Error as _;

        let err = LockError::Acquire {
            path: PathBuf::from("a.lock"),
            source: io_err(),
        };
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "denied");
    }
}
