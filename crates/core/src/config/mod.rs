//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (NOTION_MCP_*)
//! 2. `NOTION_TOKEN` for the integration secret
//! 3. TOML or JSON config file (if NOTION_MCP_CONFIG_FILE set)
//! 4. Built-in defaults
//!
//! The loaded configuration is shared through a [`ConfigHandle`], which the
//! cache and the tool handlers read on every call so that a reload takes
//! effect immediately.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::filter::FilterRules;
use crate::retry::RetryPolicy;

mod validation;

pub use validation::ConfigError;

/// Environment variable naming the optional config file.
pub const CONFIG_FILE_ENV: &str = "NOTION_MCP_CONFIG_FILE";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (NOTION_MCP_*)
/// 2. `NOTION_TOKEN`
/// 3. Config file (if NOTION_MCP_CONFIG_FILE set)
/// 4. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Notion integration token.
    ///
    /// Set via NOTION_TOKEN or NOTION_MCP_NOTION_TOKEN.
    #[serde(default)]
    pub notion_token: Option<String>,

    /// Base URL of the Notion REST API.
    ///
    /// Set via NOTION_MCP_NOTION_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub notion_base_url: String,

    /// Value sent in the `Notion-Version` header.
    #[serde(default = "default_notion_version")]
    pub notion_version: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via NOTION_MCP_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via NOTION_MCP_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retry budget for calls to the Notion API.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Response cache settings.
    #[serde(default)]
    pub caching: CachingConfig,

    /// Rules for hiding pages and databases from listings.
    #[serde(default)]
    pub filtering: FilterRules,

    /// Reload the config file when it changes on disk.
    ///
    /// Set via NOTION_MCP_WATCH_CONFIG environment variable.
    #[serde(default = "default_true")]
    pub watch_config: bool,
}

/// Retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay in milliseconds; attempt `n` waits `n * base_delay_ms`.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: default_max_attempts(), base_delay_ms: default_base_delay_ms() }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

/// Cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachingConfig {
    /// Global cache toggle, consulted on every cache read and write.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Entry lifetime in minutes. Fractions are allowed.
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: f64,
}

impl Default for CachingConfig {
    fn default() -> Self {
        Self { enabled: true, ttl_minutes: default_ttl_minutes() }
    }
}

fn default_base_url() -> String {
    "https://api.notion.com/v1".into()
}

fn default_notion_version() -> String {
    "2022-06-28".into()
}

fn default_user_agent() -> String {
    "notion-mcp/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1_000
}

fn default_ttl_minutes() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notion_token: None,
            notion_base_url: default_base_url(),
            notion_version: default_notion_version(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            retry: RetryConfig::default(),
            caching: CachingConfig::default(),
            filtering: FilterRules::default(),
            watch_config: true,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Path of the config file named by `NOTION_MCP_CONFIG_FILE`, if any.
    pub fn config_file() -> Option<PathBuf> {
        std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `NOTION_MCP_`
    /// 2. `NOTION_TOKEN`
    /// 3. File from `NOTION_MCP_CONFIG_FILE` (JSON when it ends in `.json`, TOML otherwise)
    /// 4. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_path) = Self::config_file() {
            let is_json = config_path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            figment = if is_json {
                figment.merge(Json::file(&config_path))
            } else {
                figment.merge(Toml::file(&config_path))
            };
        }

        figment = figment
            .merge(Env::raw().only(&["NOTION_TOKEN"]).map(|_| "notion_token".into()))
            .merge(
                Env::prefixed("NOTION_MCP_")
                    .ignore(&["CONFIG_FILE"])
                    .map(|key| key.as_str().to_lowercase().into())
                    .split("__"),
            );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Return the Notion token or a `Missing` error with a setup hint.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no token is configured.
    pub fn require_notion_token(&self) -> Result<&str, ConfigError> {
        self.notion_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "notion_token".into(),
                hint: "Set the NOTION_TOKEN environment variable".into(),
            })
    }
}

/// Shared, atomically replaceable view of the current [`AppConfig`].
///
/// Clones share the same underlying slot; readers never block writers.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    inner: Arc<ArcSwap<AppConfig>>,
}

impl ConfigHandle {
    pub fn new(config: AppConfig) -> Self {
        Self { inner: Arc::new(ArcSwap::from_pointee(config)) }
    }

    /// Snapshot of the current configuration.
    pub fn current(&self) -> Arc<AppConfig> {
        self.inner.load_full()
    }

    /// Whether caching is enabled right now.
    pub fn caching_enabled(&self) -> bool {
        self.inner.load().caching.enabled
    }

    /// Swap in a new configuration. Subsequent reads observe it immediately.
    pub fn replace(&self, config: AppConfig) {
        self.inner.store(Arc::new(config));
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
