//! Bounded retry with linear backoff for transient failures.
//!
//! [`with_retry`] runs an async operation up to `max_attempts` times. Only
//! errors that classify themselves as transient through [`Retryable`] are
//! retried:
//!
//! - **Rate limited**: waits for the service's `Retry-After` hint (whole
//!   seconds) when present, otherwise `base_delay * attempt`.
//! - **Network**: connection refused, name resolution failure or timeout;
//!   waits `base_delay * attempt`.
//!
//! Anything else is returned on first occurrence. When attempts run out the
//! most recent error is returned. There is no jitter and no per-attempt
//! timeout; the wait is a `tokio::time::sleep` and never blocks the runtime.

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Low-level network failures that are worth another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailure {
    /// The remote end refused the connection.
    ConnectionRefused,
    /// The host name could not be resolved.
    NameResolution,
    /// The connection or request timed out.
    TimedOut,
}

impl fmt::Display for NetworkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkFailure::ConnectionRefused => f.write_str("connection refused"),
            NetworkFailure::NameResolution => f.write_str("name resolution failed"),
            NetworkFailure::TimedOut => f.write_str("timed out"),
        }
    }
}

/// How a transient error should be retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryClass {
    /// Rate limited, with the raw `Retry-After` value if the service sent one.
    RateLimited { retry_after: Option<String> },
    /// Transient network failure.
    Network(NetworkFailure),
}

impl fmt::Display for RetryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryClass::RateLimited { .. } => f.write_str("rate limited"),
            RetryClass::Network(failure) => write!(f, "network: {failure}"),
        }
    }
}

/// Errors that can tell whether they are transient.
pub trait Retryable {
    /// `None` means the error is permanent and must not be retried.
    fn retry_class(&self) -> Option<RetryClass>;
}

/// Attempt budget and base delay for [`with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_delay: Duration::from_millis(1000) }
    }
}

impl RetryPolicy {
    /// A budget of zero attempts still runs the operation once.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_delay }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Linear backoff for the given 1-indexed attempt.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Wait before the attempt following `attempt`.
    pub fn wait_for(&self, class: &RetryClass, attempt: u32) -> Duration {
        match class {
            RetryClass::RateLimited { retry_after } => retry_after
                .as_deref()
                .and_then(parse_retry_after)
                .unwrap_or_else(|| self.backoff(attempt)),
            RetryClass::Network(_) => self.backoff(attempt),
        }
    }
}

/// Parse a `Retry-After` hint given as a positive whole number of seconds.
///
/// HTTP dates, fractions and zero are not honoured and fall back to backoff.
pub fn parse_retry_after(hint: &str) -> Option<Duration> {
    hint.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

/// Run `operation` under `policy`, retrying transient failures.
///
/// # Errors
///
/// Returns the operation's error unchanged: immediately for a permanent
/// error, or the last transient error once the attempt budget is spent.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + fmt::Display,
{
    let max_attempts = policy.max_attempts;
    let mut attempt = 1;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let Some(class) = err.retry_class() else {
            return Err(err);
        };

        if attempt >= max_attempts {
            tracing::warn!(attempt, max_attempts, reason = %class, error = %err, "retries exhausted");
            return Err(err);
        }

        let wait = policy.wait_for(&class, attempt);
        tracing::warn!(
            attempt,
            max_attempts,
            wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
            reason = %class,
            error = %err,
            "transient failure, retrying"
        );
        tokio::time::sleep(wait).await;
        attempt += 1;
    }
}
