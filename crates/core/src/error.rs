//! Unified error types for notion-mcp.
//!
//! Each variant carries a stable code prefix and maps to a JSON-RPC error
//! code when returned from a tool.

use rmcp::model::{ErrorCode, ErrorData as McpError};

use crate::config::ConfigError;

/// Unified error types for the notion-mcp server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty page id).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Notion rejected the integration token.
    #[error("NOTION_AUTH_ERROR: {0}")]
    NotionAuth(String),

    /// The object does not exist or is not shared with the integration.
    #[error("NOTION_NOT_FOUND: {0}")]
    NotionNotFound(String),

    /// Rate limited after all retries.
    #[error("NOTION_RATE_LIMITED: {0}")]
    NotionRateLimited(String),

    /// Any other error response from the Notion API.
    #[error("NOTION_API_ERROR: {0}")]
    NotionApi(String),

    /// Transport failure talking to Notion.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// Unexpected response shape.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),

    /// Configuration could not be loaded or is incomplete.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::NotionAuth(msg) => (-32001, msg.clone()),
            Error::NotionNotFound(msg) => (-32002, msg.clone()),
            Error::NotionRateLimited(msg) => (-32003, msg.clone()),
            Error::NotionApi(msg) => (-32004, msg.clone()),
            Error::Network(msg) => (-32005, msg.clone()),
            Error::Parse(msg) => (-32006, msg.clone()),
            Error::Config(e) => (-32007, e.to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
