//! notion-mcp server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use notion_mcp_client::{NotionClient, NotionConfig};
use notion_mcp_core::{AppConfig, ConfigHandle, TtlCache};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;
mod watcher;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    config.require_notion_token()?;

    let client = NotionClient::new(NotionConfig::from_app_config(&config)?)?;
    let handle = ConfigHandle::new(config.clone());
    let cache = Arc::new(TtlCache::new(config.caching.ttl_minutes, handle.clone()));
    let _watcher = watcher::spawn(&handle);

    tracing::info!(
        caching = config.caching.enabled,
        ttl_minutes = config.caching.ttl_minutes,
        max_attempts = config.retry.max_attempts,
        "Starting notion-mcp server on stdio transport"
    );

    let handler = handler::NotionMcpServer::new(Arc::new(client), Arc::clone(&cache), handle);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;
    cache.stop();

    tracing::info!("notion-mcp server stopped");
    Ok(())
}
