//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{
    CacheStatsParams, FetchPageParams, QueryDatabaseParams, SearchNotionParams, cache_stats_impl, fetch_page_impl,
    list_databases_impl, query_database_impl, search_notion_impl,
};
use notion_mcp_client::NotionApi;
use notion_mcp_core::{ConfigHandle, TtlCache};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for notion-mcp.
///
/// Each call reads the current configuration from the [`ConfigHandle`], so
/// reloaded filter and retry settings apply to the next tool call.
#[derive(Clone)]
pub struct NotionMcpServer {
    api: Arc<dyn NotionApi>,
    cache: Arc<TtlCache<String>>,
    config: ConfigHandle,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl NotionMcpServer {
    /// Create a new server handler.
    pub fn new(api: Arc<dyn NotionApi>, cache: Arc<TtlCache<String>>, config: ConfigHandle) -> Self {
        Self { api, cache, config, tool_router: Self::tool_router() }
    }

    #[tool(description = "Search Notion workspace by keyword and return page titles + URLs")]
    async fn search_notion(&self, params: Parameters<SearchNotionParams>) -> Result<CallToolResult, McpError> {
        search_notion_impl(self.api.as_ref(), &self.config.current(), params.0).await
    }

    #[tool(description = "Fetch a Notion page's title and plain text content by ID")]
    async fn fetch_page(&self, params: Parameters<FetchPageParams>) -> Result<CallToolResult, McpError> {
        fetch_page_impl(self.api.as_ref(), &self.cache, &self.config.current(), params.0).await
    }

    #[tool(description = "Query a Notion database to retrieve its entries/rows with their properties")]
    async fn query_database(&self, params: Parameters<QueryDatabaseParams>) -> Result<CallToolResult, McpError> {
        query_database_impl(self.api.as_ref(), &self.cache, &self.config.current(), params.0).await
    }

    #[tool(description = "List all databases in the connected Notion workspace")]
    async fn list_databases(&self) -> Result<CallToolResult, McpError> {
        list_databases_impl(self.api.as_ref(), &self.config.current()).await
    }

    /// Report or clear the response cache.
    #[tool(description = "Get cache statistics including size, TTL settings, and optional clear action")]
    async fn get_cache_stats(&self, params: Parameters<CacheStatsParams>) -> Result<CallToolResult, McpError> {
        cache_stats_impl(&self.cache, &self.config.current(), params.0).await
    }
}

impl ServerHandler for NotionMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "notion-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
