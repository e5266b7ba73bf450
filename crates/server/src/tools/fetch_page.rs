//! fetch_page tool implementation.
//!
//! Renders a page's title and block content as text, memoized in the
//! response cache under `page:<id>`.

use notion_mcp_client::format::render_page;
use notion_mcp_client::notion::{Block, NotionApi, NotionError};
use notion_mcp_client::{page_title, render_blocks};
use notion_mcp_core::cache::page_key;
use notion_mcp_core::{AppConfig, RetryPolicy, TtlCache, with_retry};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{notion_error, require_id};

/// Input parameters for fetch_page tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchPageParams {
    /// The Notion page ID (with or without hyphens).
    pub page_id: String,
}

/// Implementation of the fetch_page tool.
pub async fn fetch_page_impl(
    api: &dyn NotionApi, cache: &TtlCache<String>, config: &AppConfig, params: FetchPageParams,
) -> Result<CallToolResult, McpError> {
    let page_id = require_id("page_id", &params.page_id)?;
    let key = page_key(page_id);

    if let Some(cached) = cache.get(&key) {
        tracing::info!(page_id, "cache hit");
        return Ok(CallToolResult::success(vec![Content::text(cached)]));
    }
    tracing::info!(page_id, "cache miss, fetching page from Notion");

    let policy = config.retry.policy();
    let page = with_retry(&policy, || api.retrieve_page(page_id))
        .await
        .map_err(notion_error)?;
    let blocks = collect_blocks(api, &policy, page_id)
        .await
        .map_err(notion_error)?;

    let text = render_page(page_id, &page_title(&page), &render_blocks(&blocks));
    cache.set(key, text.clone());

    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Follow block-children cursors until the listing is exhausted.
async fn collect_blocks(api: &dyn NotionApi, policy: &RetryPolicy, page_id: &str) -> Result<Vec<Block>, NotionError> {
    let mut blocks = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let batch = with_retry(policy, || api.list_block_children(page_id, cursor.as_deref())).await?;
        let next = batch.next().map(str::to_string);
        blocks.extend(batch.results);

        match next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    tracing::debug!(page_id, blocks = blocks.len(), "collected page blocks");
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fake::{FakeNotion, page, paragraph, rate_limited, texts};
    use notion_mcp_core::config::CachingConfig;
    use notion_mcp_core::ConfigHandle;

    fn workspace() -> FakeNotion {
        let mut api = FakeNotion::default();
        api.pages.insert("page-1".into(), page("page-1", "Notes"));
        api.blocks.insert(
            "page-1".into(),
            vec![paragraph("b1", "one"), paragraph("b2", "two"), paragraph("b3", "three")],
        );
        api
    }

    fn params(id: &str) -> FetchPageParams {
        FetchPageParams { page_id: id.into() }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_page_renders_all_block_pages() {
        let api = workspace();
        let cache = TtlCache::new(5.0, ConfigHandle::default());

        let result = fetch_page_impl(&api, &cache, &AppConfig::default(), params("page-1")).await.unwrap();
        assert_eq!(
            texts(&result),
            vec!["Title: Notes\nURL: https://www.notion.so/page1\n\none\n\ntwo\n\nthree".to_string()]
        );
        // page + two block listings
        assert_eq!(api.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_page_served_from_cache() {
        let api = workspace();
        let cache = TtlCache::new(5.0, ConfigHandle::default());
        let config = AppConfig::default();

        let first = fetch_page_impl(&api, &cache, &config, params("page-1")).await.unwrap();
        let calls = api.calls();
        let second = fetch_page_impl(&api, &cache, &config, params("page-1")).await.unwrap();

        assert_eq!(api.calls(), calls);
        assert_eq!(texts(&first), texts(&second));
        assert!(cache.get("page:page-1").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_page_bypasses_disabled_cache() {
        let api = workspace();
        let handle = ConfigHandle::new(AppConfig {
            caching: CachingConfig { enabled: false, ..Default::default() },
            ..Default::default()
        });
        let cache = TtlCache::new(5.0, handle.clone());
        let config = handle.current();

        fetch_page_impl(&api, &cache, &config, params("page-1")).await.unwrap();
        fetch_page_impl(&api, &cache, &config, params("page-1")).await.unwrap();

        assert_eq!(api.calls(), 6);
        assert_eq!(cache.stats().size, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_empty_page() {
        let mut api = FakeNotion::default();
        api.pages.insert("page-2".into(), page("page-2", "Blank"));
        let cache = TtlCache::new(5.0, ConfigHandle::default());

        let result = fetch_page_impl(&api, &cache, &AppConfig::default(), params("page-2")).await.unwrap();
        assert_eq!(texts(&result), vec!["Title: Blank\nURL: https://www.notion.so/page2\n\n(empty page)".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_missing_page_is_not_found() {
        let api = FakeNotion::default();
        let cache = TtlCache::new(5.0, ConfigHandle::default());

        let err = fetch_page_impl(&api, &cache, &AppConfig::default(), params("missing")).await.unwrap_err();
        assert_eq!(err.code.0, -32002);
        assert_eq!(cache.stats().size, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_page_retries_then_succeeds() {
        let api = workspace().fail_with(vec![rate_limited(), rate_limited()]);
        let cache = TtlCache::new(5.0, ConfigHandle::default());

        let result = fetch_page_impl(&api, &cache, &AppConfig::default(), params("page-1")).await;
        assert!(result.is_ok());
        assert_eq!(api.calls(), 5);
    }
}
