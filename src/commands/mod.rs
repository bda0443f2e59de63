//! Command implementations for fslocker.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Each command returns the process exit code on success.

mod probe;
mod run;

use crate::cli::{Cli, Command};
use fslocker::config::Config;
use fslocker::error::Result;

/// Dispatch a command to its implementation.
///
/// Loads the config file first when one is given; otherwise defaults apply.
pub fn dispatch(cli: Cli) -> Result<i32> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Run(args) => run::cmd_run(args, &config),
        Command::Probe(args) => probe::cmd_probe(args),
    }
}
