//! In-memory response cache.
//!
//! Tool handlers memoize rendered text under keys such as `page:<id>` and
//! `database:<id>`. The cache is process-local and not persisted:
//!
//! - Fixed TTL per cache, set at construction
//! - Lazy expiry on read plus a periodic sweep
//! - Live enable/disable through the shared configuration

pub mod ttl;

pub use ttl::{CacheStats, TtlCache};

/// Cache key for a rendered page.
pub fn page_key(page_id: &str) -> String {
    format!("page:{page_id}")
}

/// Cache key for a rendered database query.
pub fn database_key(database_id: &str) -> String {
    format!("database:{database_id}")
}
