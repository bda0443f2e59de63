//! Bounded waiting on top of the non-blocking acquire.
//!
//! The kernel primitives have no timeout, so a bounded wait is a poll loop:
//! `try_lock`, sleep, back off, repeat until the deadline. A genuine error from
//! `try_lock` ends the loop immediately; only contention is retried.

use super::backend::LockBackend;
use super::locker::Locker;
use crate::error::{LockError, Result};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Default delay before the first retry
const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(10);

/// Default ceiling for the delay between retries
const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(500);

/// Default growth factor applied after each contended attempt
const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Backoff settings for a bounded wait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitOptions {
    /// Delay after the first contended attempt
    pub initial_delay: Duration,
    /// Upper bound on any single delay
    pub max_delay: Duration,
    /// Factor the delay grows by after each contended attempt
    pub multiplier: f64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl WaitOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Delay to use after `current`, capped at `max_delay`.
    pub fn next_delay(&self, current: Duration) -> Duration {
        Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

impl<B: LockBackend> Locker<B> {
    /// Wait at most `timeout` for the lock, polling with default backoff.
    ///
    /// # Errors
    ///
    /// * `LockError::Timeout` - still contended when `timeout` elapsed
    /// * anything [`Locker::try_lock`] can return
    pub fn lock_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.lock_timeout_with(timeout, &WaitOptions::default())
    }

    /// Wait at most `timeout` for the lock, polling per `options`.
    ///
    /// A zero timeout makes exactly one attempt.
    pub fn lock_timeout_with(&mut self, timeout: Duration, options: &WaitOptions) -> Result<()> {
        let start = Instant::now();
        let mut delay = options.initial_delay;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            if self.try_lock()? {
                debug!(path = %self.path().display(), attempt, "acquired lock after waiting");
                return Ok(());
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(LockError::Timeout {
                    path: self.path().to_path_buf(),
                    waited: elapsed,
                });
            }

            let pause = delay.min(timeout - elapsed);
            trace!(path = %self.path().display(), attempt, ?pause, "lock contended, backing off");
            thread::sleep(pause);
            delay = options.next_delay(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_grows_and_caps() {
        let options = WaitOptions::new()
            .with_initial_delay(Duration::from_millis(10))
            .with_max_delay(Duration::from_millis(50))
            .with_multiplier(2.0);

        let d1 = options.next_delay(options.initial_delay);
        assert_eq!(d1, Duration::from_millis(20));
        let d2 = options.next_delay(d1);
        assert_eq!(d2, Duration::from_millis(40));
        let d3 = options.next_delay(d2);
        assert_eq!(d3, Duration::from_millis(50));
    }

    #[test]
    fn huge_multiplier_saturates_at_max() {
        let options = WaitOptions::new().with_multiplier(f64::MAX);
        assert_eq!(
            options.next_delay(Duration::from_secs(1)),
            options.max_delay
        );
    }

    #[test]
    fn unit_multiplier_keeps_delay_constant() {
        let options = WaitOptions::new().with_multiplier(1.0);
        assert_eq!(options.next_delay(options.initial_delay), options.initial_delay);
    }
}
