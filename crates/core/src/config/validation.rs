//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::cache::ttl::MAX_TTL_MINUTES;
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

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `retry.max_attempts` is outside 1..=10
    /// - `retry.base_delay_ms` exceeds one minute
    /// - `caching.ttl_minutes` is negative, not finite, or longer than a year
    /// - `notion_base_url`, `notion_version` or `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if !(1..=10).contains(&self.retry.max_attempts) {
            return Err(ConfigError::Invalid {
                field: "retry.max_attempts".into(),
                reason: "must be between 1 and 10".into(),
            });
        }
        if self.retry.base_delay_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "retry.base_delay_ms".into(),
                reason: "must not exceed 60000ms".into(),
            });
        }

        if !self.caching.ttl_minutes.is_finite() || self.caching.ttl_minutes < 0.0 {
            return Err(ConfigError::Invalid {
                field: "caching.ttl_minutes".into(),
                reason: "must be a non-negative number".into(),
            });
        }
        if self.caching.ttl_minutes > MAX_TTL_MINUTES {
            return Err(ConfigError::Invalid {
                field: "caching.ttl_minutes".into(),
                reason: format!("must not exceed {MAX_TTL_MINUTES} minutes (one year)"),
            });
        }

        if self.notion_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "notion_base_url".into(), reason: "must not be empty".into() });
        }
        if self.notion_version.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "notion_version".into(), reason: "must not be empty".into() });
        }
        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        let rules = &self.filtering;
        if !rules.include_only_page_ids.is_empty() && !rules.exclude_page_ids.is_empty() {
            tracing::warn!(
                include_count = rules.include_only_page_ids.len(),
                exclude_count = rules.exclude_page_ids.len(),
                "Both include_only_page_ids and exclude_page_ids are set; \
                 excluded ids are hidden even when listed for inclusion"
            );
        }
        if !rules.include_only_database_ids.is_empty() && !rules.exclude_database_ids.is_empty() {
            tracing::warn!(
                include_count = rules.include_only_database_ids.len(),
                exclude_count = rules.exclude_database_ids.len(),
                "Both include_only_database_ids and exclude_database_ids are set; \
                 excluded ids are hidden even when listed for inclusion"
            );
        }

        Ok(())
    }
}
