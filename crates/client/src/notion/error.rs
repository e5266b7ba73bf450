//! Notion API client error types.

use std::error::Error as StdError;
use std::io;
use std::sync::Arc;

use notion_mcp_core::{Error, NetworkFailure, RetryClass, Retryable};
use serde::Deserialize;

/// Errors from the Notion API client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotionError {
    /// No integration token configured.
    #[error("missing API key: NOTION_TOKEN not set")]
    MissingToken,

    /// Request rejected before it was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Error response from the API.
    #[error("Notion API error {status}: {message}")]
    Api { status: u16, code: Option<String>, message: String, retry_after: Option<String> },

    /// Transport failure. `failure` is set when the cause is known to be transient.
    #[error("network error: {cause}")]
    Network { failure: Option<NetworkFailure>, cause: Arc<dyn StdError + Send + Sync> },

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Error body returned by the Notion API.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl NotionError {
    /// Build an [`NotionError::Api`] from a non-success response.
    pub fn from_response(status: u16, body: &str, retry_after: Option<String>) -> Self {
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"));
        NotionError::Api { status, code: parsed.code, message, retry_after }
    }

    /// Whether the API reported a rate limit.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, NotionError::Api { status: 429, .. })
            || matches!(self, NotionError::Api { code: Some(code), .. } if code == "rate_limited")
    }
}

impl Retryable for NotionError {
    fn retry_class(&self) -> Option<RetryClass> {
        match self {
            NotionError::Api { retry_after, .. } if self.is_rate_limited() => {
                Some(RetryClass::RateLimited { retry_after: retry_after.clone() })
            }
            NotionError::Network { failure: Some(failure), .. } => Some(RetryClass::Network(*failure)),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NotionError {
    fn from(err: reqwest::Error) -> Self {
        let failure = if err.is_timeout() { Some(NetworkFailure::TimedOut) } else { classify_cause(&err) };
        NotionError::Network { failure, cause: Arc::new(err) }
    }
}

/// Walk an error's source chain looking for a transient network cause.
///
/// Recognises refused connections and timeouts from `std::io`, and resolver
/// failures, which hyper only reports as text.
pub fn classify_cause(err: &(dyn StdError + 'static)) -> Option<NetworkFailure> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::ConnectionRefused => return Some(NetworkFailure::ConnectionRefused),
                io::ErrorKind::TimedOut => return Some(NetworkFailure::TimedOut),
                _ => {}
            }
        }

        let text = e.to_string().to_lowercase();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            return Some(NetworkFailure::NameResolution);
        }

        current = e.source();
    }
    None
}

impl From<NotionError> for Error {
    fn from(err: NotionError) -> Self {
        match &err {
            NotionError::MissingToken => Error::NotionAuth(err.to_string()),
            NotionError::InvalidRequest(msg) => Error::InvalidInput(msg.clone()),
            NotionError::Api { .. } if err.is_rate_limited() => Error::NotionRateLimited(err.to_string()),
            NotionError::Api { status: 401 | 403, .. } => Error::NotionAuth(err.to_string()),
            NotionError::Api { status: 404, .. } => Error::NotionNotFound(err.to_string()),
            NotionError::Api { status: 400, code: Some(code), message, .. } if code == "validation_error" => {
                Error::InvalidInput(message.clone())
            }
            NotionError::Api { .. } => Error::NotionApi(err.to_string()),
            NotionError::Network { .. } => Error::Network(err.to_string()),
            NotionError::Parse(msg) => Error::Parse(msg.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("client error (Connect)")]
    struct Wrapper {
        #[source]
        inner: io::Error,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("dns error: failed to lookup address information: Name or service not known")]
    struct DnsFailure;

    fn network(failure: Option<NetworkFailure>) -> NotionError {
        NotionError::Network { failure, cause: Arc::new(io::Error::other("boom")) }
    }

    #[test]
    fn test_from_response_parses_body() {
        let body = r#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find page"}"#;
        let err = NotionError::from_response(404, body, None);
        assert!(matches!(
            &err,
            NotionError::Api { status: 404, code: Some(code), message, .. }
                if code == "object_not_found" && message == "Could not find page"
        ));
    }

    #[test]
    fn test_from_response_without_json_body() {
        let err = NotionError::from_response(502, "<html>bad gateway</html>", None);
        assert!(matches!(&err, NotionError::Api { status: 502, code: None, message, .. } if message == "HTTP 502"));
    }

    #[test]
    fn test_rate_limit_by_status_or_code() {
        let by_status = NotionError::from_response(429, "", Some("3".into()));
        assert_eq!(by_status.retry_class(), Some(RetryClass::RateLimited { retry_after: Some("3".into()) }));

        let by_code = NotionError::from_response(400, r#"{"code":"rate_limited","message":"slow"}"#, None);
        assert_eq!(by_code.retry_class(), Some(RetryClass::RateLimited { retry_after: None }));
    }

    #[test]
    fn test_permanent_errors_are_not_retried() {
        assert_eq!(NotionError::from_response(404, "", None).retry_class(), None);
        assert_eq!(NotionError::from_response(503, "", None).retry_class(), None);
        assert_eq!(NotionError::MissingToken.retry_class(), None);
        assert_eq!(NotionError::Parse("bad json".into()).retry_class(), None);
        assert_eq!(network(None).retry_class(), None);
    }

    #[test]
    fn test_network_failures_are_retried() {
        let err = network(Some(NetworkFailure::ConnectionRefused));
        assert_eq!(err.retry_class(), Some(RetryClass::Network(NetworkFailure::ConnectionRefused)));
    }

    #[test]
    fn test_classify_cause_walks_source_chain() {
        let refused = Wrapper { inner: io::Error::from(io::ErrorKind::ConnectionRefused) };
        assert_eq!(classify_cause(&refused), Some(NetworkFailure::ConnectionRefused));

        let timed_out = Wrapper { inner: io::Error::from(io::ErrorKind::TimedOut) };
        assert_eq!(classify_cause(&timed_out), Some(NetworkFailure::TimedOut));

        assert_eq!(classify_cause(&DnsFailure), Some(NetworkFailure::NameResolution));

        let reset = Wrapper { inner: io::Error::from(io::ErrorKind::ConnectionReset) };
        assert_eq!(classify_cause(&reset), None);
    }

    #[test]
    fn test_conversion_to_core_error() {
        let body = r#"{"code":"unauthorized","message":"bad token"}"#;
        let err: Error = NotionError::from_response(401, body, None).into();
        assert!(matches!(err, Error::NotionAuth(_)));

        let err: Error = NotionError::from_response(404, "", None).into();
        assert!(matches!(err, Error::NotionNotFound(_)));

        let err: Error = NotionError::from_response(429, "", None).into();
        assert!(matches!(err, Error::NotionRateLimited(_)));

        let err: Error =
            NotionError::from_response(400, r#"{"code":"validation_error","message":"bad id"}"#, None).into();
        assert!(matches!(err, Error::InvalidInput(msg) if msg == "bad id"));

        let err: Error = NotionError::from_response(500, "", None).into();
        assert!(matches!(err, Error::NotionApi(_)));

        let err: Error = network(Some(NetworkFailure::TimedOut)).into();
        assert!(matches!(err, Error::Network(_)));
    }
}
