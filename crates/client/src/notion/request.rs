//! Notion API request bodies and validation.

use serde::Serialize;

use crate::notion::NotionError;

/// Largest page size the API accepts.
pub const MAX_PAGE_SIZE: u8 = 100;

/// Body for `POST /search`.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct SearchRequest {
    /// Text to match against titles. Omitted to list everything shared with the integration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Results per page (1-100, default 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u8>,
}

/// Body for `POST /databases/{id}/query`.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct QueryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,

    /// Results per page (1-100, default 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u8>,
}

impl SearchRequest {
    /// First page of results matching `query`. A blank query matches everything.
    pub fn query(query: impl Into<String>) -> Self {
        let query = query.into();
        let query = if query.trim().is_empty() { None } else { Some(query) };
        Self { query, page_size: Some(MAX_PAGE_SIZE) }
    }

    /// First page of everything shared with the integration.
    pub fn all() -> Self {
        Self { query: None, page_size: Some(MAX_PAGE_SIZE) }
    }

    /// Validate the request parameters.
    pub fn validate(&self) -> Result<(), NotionError> {
        validate_page_size(self.page_size)
    }
}

impl QueryRequest {
    /// Full-size page of rows starting at `start_cursor`.
    pub fn after(start_cursor: Option<String>) -> Self {
        Self { start_cursor, page_size: Some(MAX_PAGE_SIZE) }
    }

    /// Validate the request parameters.
    pub fn validate(&self) -> Result<(), NotionError> {
        validate_page_size(self.page_size)
    }
}

fn validate_page_size(page_size: Option<u8>) -> Result<(), NotionError> {
    if let Some(size) = page_size
        && !(1..=MAX_PAGE_SIZE).contains(&size)
    {
        return Err(NotionError::InvalidRequest(format!("page_size must be 1-{MAX_PAGE_SIZE}, got {size}")));
    }
    Ok(())
}

/// Check that an object id is safe to place in a request path.
///
/// Notion ids are UUIDs, with or without hyphens. Returns the trimmed id.
pub fn validate_id<'a>(field: &str, id: &'a str) -> Result<&'a str, NotionError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(NotionError::InvalidRequest(format!("{field} cannot be empty")));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(NotionError::InvalidRequest(format!("{field} contains invalid characters: {id}")));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_serialization() {
        let json = serde_json::to_value(SearchRequest::query("roadmap")).unwrap();
        assert_eq!(json, serde_json::json!({ "query": "roadmap", "page_size": 100 }));

        let json = serde_json::to_value(SearchRequest::all()).unwrap();
        assert_eq!(json, serde_json::json!({ "page_size": 100 }));
    }

    #[test]
    fn test_blank_search_query_lists_everything() {
        assert_eq!(SearchRequest::query("   "), SearchRequest::all());
        assert_eq!(SearchRequest::query(""), SearchRequest::all());
    }

    #[test]
    fn test_query_request_serialization() {
        let json = serde_json::to_value(QueryRequest::after(Some("cursor-1".into()))).unwrap();
        assert_eq!(json, serde_json::json!({ "start_cursor": "cursor-1", "page_size": 100 }));

        let json = serde_json::to_value(QueryRequest::after(None)).unwrap();
        assert_eq!(json, serde_json::json!({ "page_size": 100 }));
    }

    #[test]
    fn test_page_size_validation() {
        let req = SearchRequest { page_size: Some(0), ..Default::default() };
        assert!(matches!(req.validate(), Err(NotionError::InvalidRequest(_))));

        let req = QueryRequest { page_size: Some(101), ..Default::default() };
        assert!(req.validate().is_err());

        let req = QueryRequest { page_size: Some(100), ..Default::default() };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id("page_id", " 1a2b-3c4d ").unwrap(), "1a2b-3c4d");
        assert!(validate_id("page_id", "").is_err());
        assert!(validate_id("page_id", "   ").is_err());
        assert!(validate_id("page_id", "../users").is_err());
        assert!(validate_id("page_id", "abc?x=1").is_err());
    }
}
