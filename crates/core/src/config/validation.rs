//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 300_000;
const MAX_LOGIN_WAIT_MS: u64 = 600_000;

fn check_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if value < MIN_TIMEOUT_MS {
        return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 100ms".into() });
    }
    if value > MAX_TIMEOUT_MS {
        return Err(ConfigError::Invalid {
            field: field.into(),
            reason: "must not exceed 5 minutes (300000ms)".into(),
        });
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `page_step` is 0
    /// - `probe_timeout_ms` or `content_timeout_ms` is outside 100ms..=5 minutes
    /// - `login_wait_ms` exceeds 10 minutes
    /// - a viewport dimension is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_step == 0 {
            return Err(ConfigError::Invalid { field: "page_step".into(), reason: "must be greater than 0".into() });
        }

        check_timeout("probe_timeout_ms", self.probe_timeout_ms)?;
        check_timeout("content_timeout_ms", self.content_timeout_ms)?;

        if self.login_wait_ms > MAX_LOGIN_WAIT_MS {
            return Err(ConfigError::Invalid {
                field: "login_wait_ms".into(),
                reason: "must not exceed 10 minutes (600000ms)".into(),
            });
        }

        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(ConfigError::Invalid { field: "viewport".into(), reason: "dimensions must be non-zero".into() });
        }

        if self.max_offset < self.page_step && self.max_offset != 0 {
            tracing::warn!(
                max_offset = self.max_offset,
                page_step = self.page_step,
                "max_offset is below page_step; only offset 0 will be visited"
            );
        }

        Ok(())
    }
}
