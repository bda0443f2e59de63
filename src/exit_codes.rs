//! Exit code constants for the fslocker CLI.
//!
//! - 0: Success (or lock free, for `probe`)
//! - 1: User error (bad args, invalid config, invalid lock state)
//! - 2: Lock contended or bounded wait expired
//! - 3: I/O failure opening, locking, or releasing the lock file
//!
//! For `run`, a child that exits normally passes its own code through.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid config, or illegal lock transition.
pub const USER_ERROR: i32 = 1;

/// Lock is held by someone else, or a timed wait gave up.
pub const LOCK_CONTENDED: i32 = 2;

/// Kernel or filesystem failure while handling the lock file.
pub const IO_FAILURE: i32 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, USER_ERROR, LOCK_CONTENDED, IO_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn exit_codes_fit_in_a_byte() {
        for code in [SUCCESS, USER_ERROR, LOCK_CONTENDED, IO_FAILURE] {
            assert!(u8::try_from(code).is_ok());
        }
    }
}
