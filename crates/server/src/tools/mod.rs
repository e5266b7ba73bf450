//! MCP tool implementations.
//!
//! This module contains all tools exposed by the notion-mcp server. Each
//! tool is a plain async function so it can be exercised without a transport.

pub mod cache_stats;
pub mod fetch_page;
pub mod list_databases;
pub mod query_database;
pub mod search_notion;

#[cfg(test)]
pub(crate) mod fake;

pub use cache_stats::{CacheStatsParams, cache_stats_impl};
pub use fetch_page::{FetchPageParams, fetch_page_impl};
pub use list_databases::list_databases_impl;
pub use query_database::{QueryDatabaseParams, query_database_impl};
pub use search_notion::{SearchNotionParams, search_notion_impl};

use notion_mcp_client::NotionError;
use notion_mcp_core::Error;
use rmcp::ErrorData as McpError;

/// Convert a client failure into the JSON-RPC error returned to the caller.
pub(crate) fn notion_error(err: NotionError) -> McpError {
    Error::from(err).into()
}

/// Reject blank ids before any lookup.
pub(crate) fn require_id<'a>(field: &str, id: &'a str) -> Result<&'a str, McpError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::InvalidInput(format!("{field} cannot be empty")).into());
    }
    Ok(id)
}
