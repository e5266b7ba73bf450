//! get_cache_stats tool implementation.
//!
//! Reports occupancy of the response cache, or empties it.

use notion_mcp_core::{AppConfig, TtlCache};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What to do with the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CacheAction {
    /// Report status, size and TTL.
    #[default]
    Show,
    /// Remove every cached response.
    Clear,
}

/// Input parameters for get_cache_stats tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheStatsParams {
    /// Optional action: "show" (default) or "clear" to empty the cache.
    #[serde(default)]
    pub action: Option<CacheAction>,
}

/// Implementation of the get_cache_stats tool.
///
/// `config` should be the live snapshot so the reported status reflects
/// hot-reloaded settings.
pub async fn cache_stats_impl(
    cache: &TtlCache<String>, config: &AppConfig, params: CacheStatsParams,
) -> Result<CallToolResult, McpError> {
    if params.action.unwrap_or_default() == CacheAction::Clear {
        cache.clear();
        tracing::info!("cache cleared manually");
        return Ok(CallToolResult::success(vec![Content::text("Cache cleared successfully.")]));
    }

    let stats = cache.stats();
    let status = if config.caching.enabled { "Enabled" } else { "Disabled" };
    let ttl = stats.ttl_minutes;

    let message = [
        format!("Cache Status: {status}"),
        format!("Cached Items: {}", stats.size),
        format!("TTL: {ttl} minutes"),
        String::new(),
        "To test cache:".to_string(),
        "1. Fetch a page (it will cache it).".to_string(),
        "2. Run get_cache_stats (size should increase).".to_string(),
        "3. Fetch the same page again (should be instant - from cache).".to_string(),
        format!("4. Wait {ttl} minutes and fetch again (cache expires)."),
    ]
    .join("\n");

    Ok(CallToolResult::success(vec![Content::text(message)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fake::texts;
    use notion_mcp_core::ConfigHandle;
    use notion_mcp_core::config::CachingConfig;

    #[tokio::test(start_paused = true)]
    async fn test_show_reports_size_and_ttl() {
        let cache = TtlCache::new(5.0, ConfigHandle::default());
        cache.set("page:a", "A".to_string());
        cache.set("page:b", "B".to_string());

        let result = cache_stats_impl(&cache, &AppConfig::default(), CacheStatsParams::default()).await.unwrap();
        let text = &texts(&result)[0];
        assert!(text.starts_with("Cache Status: Enabled\nCached Items: 2\nTTL: 5 minutes\n\nTo test cache:"));
        assert!(text.ends_with("4. Wait 5 minutes and fetch again (cache expires)."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_reports_disabled_status() {
        let config = AppConfig { caching: CachingConfig { enabled: false, ttl_minutes: 0.5 }, ..Default::default() };
        let cache = TtlCache::new(0.5, ConfigHandle::new(config.clone()));

        let result = cache_stats_impl(&cache, &config, CacheStatsParams { action: Some(CacheAction::Show) })
            .await
            .unwrap();
        let text = &texts(&result)[0];
        assert!(text.starts_with("Cache Status: Disabled\nCached Items: 0\nTTL: 0.5 minutes"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_empties_cache() {
        let cache = TtlCache::new(5.0, ConfigHandle::default());
        cache.set("page:a", "A".to_string());

        let params = CacheStatsParams { action: Some(CacheAction::Clear) };
        let result = cache_stats_impl(&cache, &AppConfig::default(), params).await.unwrap();
        assert_eq!(texts(&result), vec!["Cache cleared successfully.".to_string()]);
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_action_parses_lowercase() {
        let params: CacheStatsParams = serde_json::from_str(r#"{ "action": "clear" }"#).unwrap();
        assert_eq!(params.action, Some(CacheAction::Clear));

        let params: CacheStatsParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.action, None);

        assert!(serde_json::from_str::<CacheStatsParams>(r#"{ "action": "purge" }"#).is_err());
    }
}
