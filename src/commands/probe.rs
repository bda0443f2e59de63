//! `fslocker probe`: report whether a lock is free right now.

use crate::cli::ProbeArgs;
use chrono::{DateTime, Utc};
use fslocker::error::{LockError, Result};
use fslocker::exit_codes;
use fslocker::locks::Locker;
use serde::Serialize;

/// Outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeState {
    Free,
    Held,
}

impl ProbeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeState::Free => "free",
            ProbeState::Held => "held",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            ProbeState::Free => exit_codes::SUCCESS,
            ProbeState::Held => exit_codes::LOCK_CONTENDED,
        }
    }
}

/// JSON report printed with `--json`.
#[derive(Debug, Serialize)]
struct ProbeReport {
    path: String,
    state: ProbeState,
    checked_at: DateTime<Utc>,
}

pub fn cmd_probe(args: ProbeArgs) -> Result<i32> {
    let mut locker = Locker::new(&args.lockfile);

    let state = match locker.try_acquire()? {
        Some(guard) => {
            guard.release()?;
            ProbeState::Free
        }
        None => ProbeState::Held,
    };

    if args.json {
        let report = ProbeReport {
            path: args.lockfile.display().to_string(),
            state,
            checked_at: Utc::now(),
        };
        let json = serde_json::to_string(&report)
            .map_err(|e| LockError::Command(format!("failed to serialize probe report: {}", e)))?;
        println!("{}", json);
    } else {
        println!("{}", state.as_str());
    }

    Ok(state.exit_code())
}
