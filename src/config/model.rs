//! Config struct definition and default implementation.

use serde::Deserialize;

/// Default delay before the first retry of a bounded wait, in milliseconds.
pub(super) const DEFAULT_POLL_INITIAL_MS: u64 = 10;

/// Default ceiling for the delay between retries, in milliseconds.
pub(super) const DEFAULT_POLL_MAX_MS: u64 = 500;

/// Default growth factor for the retry delay.
pub(super) const DEFAULT_POLL_MULTIPLIER: f64 = 2.0;

/// Configuration for lock acquisition.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delay after the first contended attempt of a bounded wait.
    pub poll_initial_ms: u64,

    /// Upper bound on any single delay between attempts.
    pub poll_max_ms: u64,

    /// Factor the delay grows by after each contended attempt.
    pub poll_multiplier: f64,

    /// Timeout applied when no explicit one is given.
    /// Absent means block until the lock is free.
    pub default_timeout_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_initial_ms: DEFAULT_POLL_INITIAL_MS,
            poll_max_ms: DEFAULT_POLL_MAX_MS,
            poll_multiplier: DEFAULT_POLL_MULTIPLIER,
            default_timeout_ms: None,
        }
    }
}
