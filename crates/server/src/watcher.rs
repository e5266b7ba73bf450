//! Configuration file watcher for hot reload.
//!
//! Filter rules, retry settings and the cache toggle are read per call and
//! take effect on the next tool invocation. Settings consumed at startup
//! (token, HTTP client options, cache TTL) are logged and need a restart.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use notion_mcp_core::{AppConfig, ConfigHandle};
use tokio::sync::mpsc;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<AppConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<AppConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (Self { path: path.to_path_buf(), update_tx }, update_rx)
    }

    /// Start watching the file. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    tracing::info!("config file change detected, reloading");
                    match AppConfig::load() {
                        Ok(next) => {
                            let _ = tx.send(next);
                        }
                        Err(e) => tracing::error!(error = %e, "failed to reload config, keeping current configuration"),
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "config watcher started");
        Ok(watcher)
    }
}

/// Watch the config file named by `NOTION_MCP_CONFIG_FILE` and apply reloads to `handle`.
///
/// Returns `None` when watching is disabled, no file is configured, or the
/// watcher could not be started.
pub fn spawn(handle: &ConfigHandle) -> Option<RecommendedWatcher> {
    if !handle.current().watch_config {
        return None;
    }
    let path = AppConfig::config_file()?;

    let (watcher, mut updates) = ConfigWatcher::new(&path);
    let watcher = match watcher.run() {
        Ok(watcher) => watcher,
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "could not watch config file, hot reload disabled");
            return None;
        }
    };

    let handle = handle.clone();
    tokio::spawn(async move {
        while let Some(next) = updates.recv().await {
            apply_update(&handle, next);
        }
    });

    Some(watcher)
}

/// Swap `next` into `handle`, warning about settings that only apply at startup.
pub fn apply_update(handle: &ConfigHandle, next: AppConfig) {
    let current = handle.current();
    for field in restart_required(&current, &next) {
        tracing::warn!(field, "setting changed on disk; restart to apply");
    }
    handle.replace(next);
    tracing::info!("configuration reloaded");
}

/// Names of changed settings that are only read at startup.
pub fn restart_required(current: &AppConfig, next: &AppConfig) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if current.notion_token != next.notion_token {
        fields.push("notion_token");
    }
    if current.notion_base_url != next.notion_base_url {
        fields.push("notion_base_url");
    }
    if current.notion_version != next.notion_version {
        fields.push("notion_version");
    }
    if current.user_agent != next.user_agent {
        fields.push("user_agent");
    }
    if current.timeout_ms != next.timeout_ms {
        fields.push("timeout_ms");
    }
    if current.caching.ttl_minutes != next.caching.ttl_minutes {
        fields.push("caching.ttl_minutes");
    }
    if current.watch_config != next.watch_config {
        fields.push("watch_config");
    }
    fields
}
