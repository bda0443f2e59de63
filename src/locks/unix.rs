//! Advisory whole-file locking with `flock(2)`.

use super::backend::LockBackend;
use std::fs::File;
use std::io;
use std::os::unix::io::{AsRawFd, IntoRawFd};

/// `flock(2)` backend.
///
/// Locks belong to the open file description, so two handles opened
/// separately on the same path contend with each other even inside one
/// process.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flock;

fn flock(file: &File, operation: libc::c_int) -> io::Result<()> {
    // SAFETY: the descriptor is owned by `file` and stays open for the call.
    let rc = unsafe { libc::flock(file.as_raw_fd(), operation) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

impl LockBackend for Flock {
    fn lock_exclusive(file: &File) -> io::Result<()> {
        flock(file, libc::LOCK_EX)
    }

    fn try_lock_exclusive(file: &File) -> io::Result<bool> {
        match flock(file, libc::LOCK_EX | libc::LOCK_NB) {
            Ok(()) => Ok(true),
            // EWOULDBLOCK and EAGAIN both land here
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn unlock(file: &File) -> io::Result<()> {
        flock(file, libc::LOCK_UN)
    }

    fn close(file: File) -> io::Result<()> {
        let fd = file.into_raw_fd();
        // SAFETY: `into_raw_fd` transferred ownership; nothing else closes it.
        let rc = unsafe { libc::close(fd) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use tempfile::TempDir;

    fn open(path: &std::path::Path) -> File {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .unwrap()
    }

    #[test]
    fn separate_descriptions_contend() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.lock");
        let first = open(&path);
        let second = open(&path);

        Flock::lock_exclusive(&first).unwrap();
        assert!(!Flock::try_lock_exclusive(&second).unwrap());

        Flock::unlock(&first).unwrap();
        assert!(Flock::try_lock_exclusive(&second).unwrap());
        Flock::unlock(&second).unwrap();
    }

    #[test]
    fn close_releases_the_lock() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.lock");
        let first = open(&path);
        let second = open(&path);

        assert!(Flock::try_lock_exclusive(&first).unwrap());
        Flock::close(first).unwrap();

        assert!(Flock::try_lock_exclusive(&second).unwrap());
    }

    #[test]
    fn advisory_lock_does_not_block_plain_io() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.lock");
        let holder = open(&path);
        Flock::lock_exclusive(&holder).unwrap();

        // A process that never asks for the lock is not stopped by it.
        std::fs::write(&path, b"bypass").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"bypass");

        Flock::unlock(&holder).unwrap();
    }
}
