//! Notion REST API client.
//!
//! Provides a client for the subset of the Notion API the tools need:
//! search, page and database retrieval, block children and database queries.
//!
//! ### Specification
//!
//! - **Endpoint**: `https://api.notion.com/v1`
//! - **Authentication**: `Authorization: Bearer <token>` plus a pinned
//!   `Notion-Version` header.
//! - **Pagination**: cursor based (`start_cursor` / `next_cursor`).
//! - **Errors**: non-2xx responses become [`NotionError::Api`] with the
//!   `Retry-After` header preserved for the retry executor.

pub mod error;
pub mod request;
pub mod response;

pub use error::NotionError;
pub use request::{QueryRequest, SearchRequest, validate_id};
pub use response::{
    Block, BlockContent, Database, Page, Paginated, Parent, Property, PropertySchema, PropertyValue, RichText,
    SearchObject,
};

use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

/// Default base URL for the Notion API.
const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// API version pinned by this client.
const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "notion-mcp/0.1";

/// Notion client configuration.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    /// Integration token.
    pub token: String,
    /// Base URL (default: https://api.notion.com/v1).
    pub base_url: String,
    /// `Notion-Version` header value.
    pub notion_version: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: notion-mcp/0.x).
    pub user_agent: String,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl NotionConfig {
    /// Build a client configuration from the application config.
    pub fn from_app_config(config: &notion_mcp_core::AppConfig) -> Result<Self, NotionError> {
        let token = config
            .require_notion_token()
            .map_err(|_| NotionError::MissingToken)?
            .to_string();

        Ok(Self {
            token,
            base_url: config.notion_base_url.clone(),
            notion_version: config.notion_version.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// Operations the tools perform against Notion.
///
/// Implemented by [`NotionClient`]; tests substitute an in-memory workspace.
#[async_trait::async_trait]
pub trait NotionApi: Send + Sync {
    /// `POST /search`
    async fn search(&self, request: &SearchRequest) -> Result<Paginated<SearchObject>, NotionError>;

    /// `GET /pages/{id}`
    async fn retrieve_page(&self, page_id: &str) -> Result<Page, NotionError>;

    /// `GET /blocks/{id}/children`
    async fn list_block_children(
        &self, block_id: &str, start_cursor: Option<&str>,
    ) -> Result<Paginated<Block>, NotionError>;

    /// `GET /databases/{id}`
    async fn retrieve_database(&self, database_id: &str) -> Result<Database, NotionError>;

    /// `POST /databases/{id}/query`
    async fn query_database(&self, database_id: &str, request: &QueryRequest) -> Result<Paginated<Page>, NotionError>;
}

/// Notion API client.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
}

impl NotionClient {
    /// Create a new Notion client with the given configuration.
    pub fn new(config: NotionConfig) -> Result<Self, NotionError> {
        if config.token.trim().is_empty() {
            return Err(NotionError::MissingToken);
        }

        let base_url = url::Url::parse(&config.base_url)
            .map_err(|e| NotionError::InvalidRequest(format!("invalid base URL {}: {e}", config.base_url)))?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| NotionError::InvalidRequest("token contains invalid header characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            "notion-version",
            HeaderValue::from_str(&config.notion_version)
                .map_err(|_| NotionError::InvalidRequest("invalid Notion-Version".into()))?,
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        Ok(Self { http, base_url: base_url.as_str().trim_end_matches('/').to_string() })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, NotionError> {
        let start = Instant::now();
        let response = request.send().await?;

        let status = response.status();
        tracing::debug!(%status, elapsed = ?start.elapsed(), "Notion API response");

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await.unwrap_or_default();
            return Err(NotionError::from_response(status.as_u16(), &body, retry_after));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| NotionError::Parse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl NotionApi for NotionClient {
    async fn search(&self, request: &SearchRequest) -> Result<Paginated<SearchObject>, NotionError> {
        request.validate()?;
        tracing::debug!(query = ?request.query, "searching Notion");
        self.send(self.http.post(self.endpoint("search")).json(request)).await
    }

    async fn retrieve_page(&self, page_id: &str) -> Result<Page, NotionError> {
        let page_id = validate_id("page_id", page_id)?;
        self.send(self.http.get(self.endpoint(&format!("pages/{page_id}")))).await
    }

    async fn list_block_children(
        &self, block_id: &str, start_cursor: Option<&str>,
    ) -> Result<Paginated<Block>, NotionError> {
        let block_id = validate_id("block_id", block_id)?;
        let mut builder = self
            .http
            .get(self.endpoint(&format!("blocks/{block_id}/children")))
            .query(&[("page_size", request::MAX_PAGE_SIZE.to_string())]);
        if let Some(cursor) = start_cursor {
            builder = builder.query(&[("start_cursor", cursor)]);
        }
        self.send(builder).await
    }

    async fn retrieve_database(&self, database_id: &str) -> Result<Database, NotionError> {
        let database_id = validate_id("database_id", database_id)?;
        self.send(self.http.get(self.endpoint(&format!("databases/{database_id}")))).await
    }

    async fn query_database(&self, database_id: &str, request: &QueryRequest) -> Result<Paginated<Page>, NotionError> {
        let database_id = validate_id("database_id", database_id)?;
        request.validate()?;
        self.send(
            self.http
                .post(self.endpoint(&format!("databases/{database_id}/query")))
                .json(request),
        )
        .await
    }
}
