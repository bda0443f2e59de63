//! Mandatory byte-range locking with `LockFileEx`.

use super::backend::LockBackend;
use std::fs::File;
use std::io;
use std::os::windows::io::{AsRawHandle, IntoRawHandle};
use windows_sys::Win32::Foundation::{
    CloseHandle, ERROR_IO_PENDING, ERROR_LOCK_VIOLATION, HANDLE,
};
use windows_sys::Win32::Storage::FileSystem::{
    LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY, LockFileEx, UnlockFileEx,
};
use windows_sys::Win32::System::IO::OVERLAPPED;

/// Lock length split into the low/high halves `LockFileEx` expects.
/// Together they cover every addressable byte from offset 0.
const RANGE_LEN_LOW: u32 = u32::MAX;
const RANGE_LEN_HIGH: u32 = u32::MAX;

/// `LockFileEx` backend over the full addressable range.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeLock;

fn raw(file: &File) -> HANDLE {
    file.as_raw_handle() as HANDLE
}

/// OVERLAPPED positioned at offset 0 with no completion event.
fn origin() -> OVERLAPPED {
    // SAFETY: OVERLAPPED is plain old data and all-zero is its documented
    // initial state.
    unsafe { std::mem::zeroed() }
}

fn lock_range(file: &File, flags: u32) -> io::Result<()> {
    let mut overlapped = origin();
    // SAFETY: the handle is owned by `file` and `overlapped` outlives the call.
    let ok = unsafe {
        LockFileEx(
            raw(file),
            flags,
            0,
            RANGE_LEN_LOW,
            RANGE_LEN_HIGH,
            &mut overlapped,
        )
    };
    if ok == 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

fn is_contention(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(code) if code == ERROR_LOCK_VIOLATION as i32 || code == ERROR_IO_PENDING as i32
    )
}

impl LockBackend for RangeLock {
    fn lock_exclusive(file: &File) -> io::Result<()> {
        lock_range(file, LOCKFILE_EXCLUSIVE_LOCK)
    }

    fn try_lock_exclusive(file: &File) -> io::Result<bool> {
        match lock_range(file, LOCKFILE_EXCLUSIVE_LOCK | LOCKFILE_FAIL_IMMEDIATELY) {
            Ok(()) => Ok(true),
            Err(e) if is_contention(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn unlock(file: &File) -> io::Result<()> {
        // Must name the same range the lock was taken on.
        let mut overlapped = origin();
        // SAFETY: same as `lock_range`.
        let ok = unsafe {
            UnlockFileEx(
                raw(file),
                0,
                RANGE_LEN_LOW,
                RANGE_LEN_HIGH,
                &mut overlapped,
            )
        };
        if ok == 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }

    fn close(file: File) -> io::Result<()> {
        let handle = file.into_raw_handle() as HANDLE;
        // SAFETY: `into_raw_handle` transferred ownership; nothing else closes it.
        let ok = unsafe { CloseHandle(handle) };
        if ok == 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }
}
