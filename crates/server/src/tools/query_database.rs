//! query_database tool implementation.
//!
//! Lists every row of a database with its non-empty properties, memoized in
//! the response cache under `database:<id>`.

use notion_mcp_client::format::{database_title, render_database, render_empty_database};
use notion_mcp_client::notion::{NotionApi, NotionError, Page, QueryRequest};
use notion_mcp_core::cache::database_key;
use notion_mcp_core::{AppConfig, RetryPolicy, TtlCache, with_retry};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{notion_error, require_id};

/// Input parameters for query_database tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryDatabaseParams {
    /// The Notion database ID (with or without hyphens).
    pub database_id: String,
}

/// Implementation of the query_database tool.
///
/// The "empty database" message is returned without being cached.
pub async fn query_database_impl(
    api: &dyn NotionApi, cache: &TtlCache<String>, config: &AppConfig, params: QueryDatabaseParams,
) -> Result<CallToolResult, McpError> {
    let database_id = require_id("database_id", &params.database_id)?;
    let key = database_key(database_id);

    if let Some(cached) = cache.get(&key) {
        tracing::info!(database_id, "cache hit");
        return Ok(CallToolResult::success(vec![Content::text(cached)]));
    }
    tracing::info!(database_id, "cache miss, querying database from Notion");

    let policy = config.retry.policy();
    let database = with_retry(&policy, || api.retrieve_database(database_id))
        .await
        .map_err(notion_error)?;
    let rows = collect_rows(api, &policy, database_id)
        .await
        .map_err(notion_error)?;

    if rows.is_empty() {
        let text = render_empty_database(&database_title(&database));
        return Ok(CallToolResult::success(vec![Content::text(text)]));
    }

    let text = render_database(database_id, &database, &rows);
    cache.set(key, text.clone());

    Ok(CallToolResult::success(vec![Content::text(text)]))
}

async fn collect_rows(api: &dyn NotionApi, policy: &RetryPolicy, database_id: &str) -> Result<Vec<Page>, NotionError> {
    let mut rows = Vec::new();
    let mut request = QueryRequest::after(None);

    loop {
        let batch = with_retry(policy, || api.query_database(database_id, &request)).await?;
        let next = batch.next().map(str::to_string);
        rows.extend(batch.results);

        match next {
            Some(next) => request = QueryRequest::after(Some(next)),
            None => break,
        }
    }

    Ok(rows)
}
