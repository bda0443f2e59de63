//! Config loading, validation, and conversion operations.

use super::model::Config;
use crate::error::{LockError, Result};
use crate::locks::WaitOptions;
use std::path::Path;
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(LockError::Config)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LockError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| LockError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `poll_initial_ms` must be positive
    /// - `poll_max_ms` must be at least `poll_initial_ms`
    /// - `poll_multiplier` must be finite and at least 1.0
    pub fn validate(&self) -> Result<()> {
        if self.poll_initial_ms == 0 {
            return Err(LockError::Config(
                "config validation failed: poll_initial_ms must be greater than 0".to_string(),
            ));
        }

        if self.poll_max_ms < self.poll_initial_ms {
            return Err(LockError::Config(format!(
                "config validation failed: poll_max_ms ({}) must be at least poll_initial_ms ({})",
                self.poll_max_ms, self.poll_initial_ms
            )));
        }

        if !self.poll_multiplier.is_finite() || self.poll_multiplier < 1.0 {
            return Err(LockError::Config(format!(
                "config validation failed: poll_multiplier must be a finite number >= 1.0 (found {})",
                self.poll_multiplier
            )));
        }

        Ok(())
    }

    /// Backoff settings for bounded waits.
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::new()
            .with_initial_delay(Duration::from_millis(self.poll_initial_ms))
            .with_max_delay(Duration::from_millis(self.poll_max_ms))
            .with_multiplier(self.poll_multiplier)
    }

    /// The configured default timeout, if any.
    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout_ms.map(Duration::from_millis)
    }
}
