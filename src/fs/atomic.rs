//! Atomic file replacement.
//!
//! # Implementation Strategy
//!
//! 1. Write content to a temporary file in the same directory
//! 2. Sync the file to disk (fsync)
//! 3. Atomically replace the original file
//!
//! # Cross-Platform Behavior
//!
//! - **POSIX (Linux, macOS)**: `rename()` is atomic on one filesystem; the
//!   parent directory is fsynced afterwards so the new entry is durable.
//! - **Windows**: `MoveFileExW` with `MOVEFILE_REPLACE_EXISTING` and
//!   `MOVEFILE_WRITE_THROUGH`.
//!
//! Atomicity covers a single writer only. Concurrent writers must serialize
//! through a lock; see [`super::locked_write`].

use crate::error::{LockError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-process sequence for temp file names.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Atomically write bytes to a file.
///
/// The target is never observed in a partial state. The parent directory must
/// already exist.
///
/// # Errors
///
/// * `LockError::Write` - writing the temp file, renaming it, or syncing the
///   parent directory (unix) failed
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let temp_path = generate_temp_path(path)?;

    write_and_sync(&temp_path, content).inspect_err(|_| {
        let _ = fs::remove_file(&temp_path);
    })?;

    atomic_replace(&temp_path, path).inspect_err(|_| {
        let _ = fs::remove_file(&temp_path);
    })
}

/// Generate a temporary file path in the same directory as the target.
///
/// Named `.{filename}.{pid}.{seq}.tmp`: unique across processes and across
/// calls within one process.
fn generate_temp_path(target: &Path) -> Result<PathBuf> {
    let parent = parent_dir(target);
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LockError::Write {
            path: target.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid file path"),
        })?;

    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let temp_name = format!(".{}.{}.{}.tmp", filename, std::process::id(), seq);
    Ok(parent.join(temp_name))
}

/// Directory holding `target`; `.` for a bare file name.
fn parent_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let write_err = |source| LockError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(write_err)?;
    file.write_all(content).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    Ok(())
}

#[cfg(unix)]
fn atomic_replace(source: &Path, target: &Path) -> Result<()> {
    fs::rename(source, target).map_err(|e| LockError::Write {
        path: target.to_path_buf(),
        source: e,
    })?;

    // Persist the directory entry as well.
    let parent = parent_dir(target);
    File::open(parent)
        .and_then(|dir| dir.sync_all())
        .map_err(|e| LockError::Write {
            path: parent.to_path_buf(),
            source: e,
        })
}

#[cfg(windows)]
fn atomic_replace(source: &Path, target: &Path) -> Result<()> {
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::Storage::FileSystem::{
        MOVEFILE_REPLACE_EXISTING, MOVEFILE_WRITE_THROUGH, MoveFileExW,
    };

    let wide = |p: &Path| -> Vec<u16> {
        p.as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect()
    };
    let source_wide = wide(source);
    let target_wide = wide(target);

    // SAFETY: both buffers are NUL-terminated and outlive the call.
    let ok = unsafe {
        MoveFileExW(
            source_wide.as_ptr(),
            target_wide.as_ptr(),
            MOVEFILE_REPLACE_EXISTING | MOVEFILE_WRITE_THROUGH,
        )
    };
    if ok == 0 {
        return Err(LockError::Write {
            path: target.to_path_buf(),
            source: std::io::Error::last_os_error(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        atomic_write(&file_path, b"hello world").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "hello world");
    }

    #[test]
    fn test_atomic_write_replace_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");
        fs::write(&file_path, "original content").unwrap();

        atomic_write(&file_path, b"new content").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "new content");
    }

    #[test]
    fn test_atomic_write_requires_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("test.txt");

        let err = atomic_write(&file_path, b"nested content").unwrap_err();

        assert!(matches!(err, LockError::Write { .. }));
        assert!(!temp_dir.path().join("nested").exists());
    }

    #[test]
    fn test_atomic_write_temp_file_cleanup() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        atomic_write(&file_path, b"content").unwrap();

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|n| n.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "{leftovers:?}");
    }

    #[test]
    fn test_generate_temp_path() {
        let target = Path::new("/some/path/file.txt");
        let temp = generate_temp_path(target).unwrap();
        let name = temp.file_name().unwrap().to_str().unwrap();

        assert_eq!(temp.parent().unwrap(), Path::new("/some/path"));
        assert!(name.starts_with(".file.txt."));
        assert!(name.contains(&std::process::id().to_string()));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn test_temp_paths_differ_per_call() {
        let target = Path::new("/some/path/file.txt");
        let first = generate_temp_path(target).unwrap();
        let second = generate_temp_path(target).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_parent_dir_of_bare_name_is_cwd() {
        assert_eq!(parent_dir(Path::new("state.json")), Path::new("."));
        assert_eq!(parent_dir(Path::new("/data/state.json")), Path::new("/data"));
    }

    #[cfg(unix)]
    #[test]
    fn test_concurrent_unlocked_writes_stay_whole() {
        use std::sync::{Arc, Barrier};
        use std::thread;

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("shared.txt");
        let writers = 8;
        let payload_len = 64 * 1024;
        let barrier = Arc::new(Barrier::new(writers));

        let handles: Vec<_> = (0..writers)
            .map(|i| {
                let file_path = file_path.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let payload = vec![b'a' + i as u8; payload_len];
                    barrier.wait();
                    atomic_write(&file_path, &payload).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Some writer won; its content is complete and unmixed.
        let content = fs::read(&file_path).unwrap();
        assert_eq!(content.len(), payload_len);
        assert!(content.iter().all(|b| *b == content[0]));
    }

    #[test]
    fn test_atomic_write_binary_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("binary.bin");
        let binary_content: Vec<u8> = (0..=255).collect();

        atomic_write(&file_path, &binary_content).unwrap();

        assert_eq!(fs::read(&file_path).unwrap(), binary_content);
    }

    #[test]
    fn test_atomic_write_empty_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("empty.txt");
        fs::write(&file_path, "stale").unwrap();

        atomic_write(&file_path, b"").unwrap();

        assert!(fs::read(&file_path).unwrap().is_empty());
    }
}
