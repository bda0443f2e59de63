//! CLI argument parsing for fslocker.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// fslocker: hold an exclusive cross-process lock on a file.
///
/// The lock file is created if missing (its directory must exist) and is
/// never deleted. On Unix the lock is advisory: only processes that also use
/// the lock are excluded.
#[derive(Parser, Debug)]
#[command(name = "fslocker")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// YAML config file with polling and timeout defaults.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for fslocker.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command while holding the lock.
    ///
    /// Waits for the lock by default. The exit code is the command's own,
    /// or 2 if the lock could not be taken in time.
    Run(RunArgs),

    /// Report whether the lock is currently free.
    ///
    /// Prints `free` (exit 0) or `held` (exit 2). The lock is taken and
    /// released immediately when free.
    Probe(ProbeArgs),
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Fail immediately if the lock is held.
    #[arg(short = 'n', long, conflicts_with = "timeout_ms")]
    pub nonblock: bool,

    /// Give up after this many milliseconds.
    #[arg(short = 't', long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Command line as one shell-quoted string instead of trailing arguments.
    #[arg(short = 'c', long = "command", value_name = "CMDLINE", conflicts_with = "args")]
    pub command: Option<String>,

    /// Lock file path.
    pub lockfile: PathBuf,

    /// Program and arguments to run.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "CMD")]
    pub args: Vec<String>,
}

/// Arguments for the `probe` command.
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Lock file path.
    pub lockfile: PathBuf,

    /// Emit a JSON report instead of plain text.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
