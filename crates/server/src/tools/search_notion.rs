//! search_notion tool implementation.
//!
//! Keyword search over pages shared with the integration.

use notion_mcp_client::notion::{NotionApi, SearchObject, SearchRequest};
use notion_mcp_client::{notion_url, page_title};
use notion_mcp_core::{AppConfig, ItemKind, with_retry};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::notion_error;

/// Input parameters for search_notion tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchNotionParams {
    /// The search query to find pages in Notion. Empty lists every shared page.
    pub query: String,
}

/// Implementation of the search_notion tool.
///
/// Databases in the results are skipped; filtered pages are dropped. Each
/// remaining page becomes one text item.
pub async fn search_notion_impl(
    api: &dyn NotionApi, config: &AppConfig, params: SearchNotionParams,
) -> Result<CallToolResult, McpError> {
    let query = params.query.trim();
    let request = SearchRequest::query(query);
    let response = with_retry(&config.retry.policy(), || api.search(&request))
        .await
        .map_err(notion_error)?;

    let lines: Vec<String> = response
        .results
        .iter()
        .filter_map(|item| match item {
            SearchObject::Page(page) => Some(page),
            SearchObject::Database(_) => None,
        })
        .filter_map(|page| {
            let title = page_title(page);
            if config.filtering.should_filter(&title, &page.id, ItemKind::Page) {
                tracing::debug!(id = %page.id, %title, "page filtered from search results");
                return None;
            }
            Some(format!("{title} — {}", notion_url(&page.id)))
        })
        .collect();

    tracing::info!(query, results = lines.len(), "search_notion complete");

    if lines.is_empty() {
        return Ok(CallToolResult::success(vec![Content::text(format!("No results found for \"{query}\"."))]));
    }

    Ok(CallToolResult::success(lines.into_iter().map(Content::text).collect()))
}
