//! `fslocker run`: hold the lock for the lifetime of a child process.

use crate::cli::RunArgs;
use fslocker::config::Config;
use fslocker::error::{LockError, Result};
use fslocker::exit_codes;
use fslocker::locks::Locker;
use std::process::{Command, ExitStatus};
use std::time::Duration;
use tracing::{debug, info};

pub fn cmd_run(args: RunArgs, config: &Config) -> Result<i32> {
    let argv = command_line(&args)?;
    let mut locker = Locker::new(&args.lockfile);

    let timeout = args
        .timeout_ms
        .map(Duration::from_millis)
        .or_else(|| config.default_timeout());

    let guard = if args.nonblock {
        match locker.try_acquire()? {
            Some(guard) => guard,
            None => {
                eprintln!(
                    "fslocker: '{}' is held by another process",
                    args.lockfile.display()
                );
                return Ok(exit_codes::LOCK_CONTENDED);
            }
        }
    } else if let Some(timeout) = timeout {
        locker.acquire_timeout_with(timeout, &config.wait_options())?
    } else {
        locker.acquire()?
    };

    info!(lock = %guard.path().display(), program = %argv[0], "running under lock");
    let status = Command::new(&argv[0])
        .args(&argv[1..])
        .status()
        .map_err(|e| LockError::Command(format!("failed to run '{}': {}", argv[0], e)))?;
    debug!(?status, "command finished");

    guard.release()?;
    Ok(exit_code_of(status))
}

/// Program and arguments, from `--command` or the trailing arguments.
fn command_line(args: &RunArgs) -> Result<Vec<String>> {
    let argv = match &args.command {
        Some(line) => shell_words::split(line)
            .map_err(|e| LockError::Command(format!("invalid command line '{}': {}", line, e)))?,
        None => args.args.clone(),
    };

    if argv.is_empty() {
        return Err(LockError::Command("no command given".to_string()));
    }
    Ok(argv)
}

/// Exit code to report for a finished child.
///
/// Signal deaths map to 128 + signal number, as shells do.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    exit_codes::USER_ERROR
}
