//! list_databases tool implementation.
//!
//! Search returns databases directly only for some workspaces; rows of a
//! database come back as pages whose parent names the database, so those
//! parents are resolved as well.

use std::collections::HashSet;

use notion_mcp_client::notion::{Database, NotionApi, SearchObject, SearchRequest};
use notion_mcp_client::{database_title, notion_url};
use notion_mcp_core::{AppConfig, ItemKind, with_retry};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};

use super::notion_error;

/// Debug lines included when nothing is found.
const MAX_DEBUG_LINES: usize = 10;

/// Implementation of the list_databases tool.
pub async fn list_databases_impl(api: &dyn NotionApi, config: &AppConfig) -> Result<CallToolResult, McpError> {
    let policy = config.retry.policy();
    let request = SearchRequest::all();
    let response = with_retry(&policy, || api.search(&request))
        .await
        .map_err(notion_error)?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut databases: Vec<Database> = Vec::new();
    let mut debug_lines: Vec<String> = Vec::new();

    for item in response.results {
        match item {
            SearchObject::Database(database) => {
                debug_lines.push(format!("Object type: database, ID: {}", database.id));
                if seen.insert(database.id.clone()) {
                    databases.push(database);
                }
            }
            SearchObject::Page(page) => {
                debug_lines.push(format!("Object type: page, ID: {}", page.id));
                let Some(database_id) = page.parent.as_ref().and_then(|parent| parent.database_id()) else {
                    continue;
                };
                if !seen.insert(database_id.to_string()) {
                    continue;
                }
                match with_retry(&policy, || api.retrieve_database(database_id)).await {
                    Ok(database) => databases.push(database),
                    Err(e) => tracing::warn!(database_id, error = %e, "failed to fetch parent database"),
                }
            }
        }
    }

    if databases.is_empty() {
        let debug: Vec<&str> = debug_lines.iter().take(MAX_DEBUG_LINES).map(String::as_str).collect();
        let text = format!(
            "No databases found in your Notion workspace. \
             Make sure your integration has access to the target pages.\n\nDebug info:\n{}",
            debug.join("\n")
        );
        return Ok(CallToolResult::success(vec![Content::text(text)]));
    }

    let total = databases.len();
    let lines: Vec<String> = databases
        .iter()
        .filter_map(|database| {
            let title = database_title(database);
            if config.filtering.should_filter(&title, &database.id, ItemKind::Database) {
                return None;
            }
            Some(format!("{title} — {} (ID: {})", notion_url(&database.id), database.id))
        })
        .collect();

    tracing::info!(found = total, shown = lines.len(), "list_databases complete");

    if lines.is_empty() {
        return Ok(CallToolResult::success(vec![Content::text("No databases matched the current filters.")]));
    }

    Ok(CallToolResult::success(lines.into_iter().map(Content::text).collect()))
}
