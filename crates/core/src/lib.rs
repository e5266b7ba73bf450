//! Core types and shared functionality for notion-mcp.
//!
//! This crate provides:
//! - In-memory TTL cache for rendered responses
//! - Retry executor for transient Notion failures
//! - Filter rules for hiding pages and databases
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod retry;

pub use cache::{CacheStats, TtlCache};
pub use config::{AppConfig, ConfigError, ConfigHandle};
pub use error::Error;
pub use filter::{FilterRules, ItemKind, should_filter};
pub use retry::{NetworkFailure, RetryClass, RetryPolicy, Retryable, with_retry};
