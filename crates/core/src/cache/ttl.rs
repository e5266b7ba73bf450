//! Time-to-live memoization cache.

use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::ConfigHandle;

/// Shortest sweep period; a zero TTL would otherwise make a zero-period timer.
const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(1);

/// Longest supported TTL (one year). Larger values are clamped to it.
pub const MAX_TTL_MINUTES: f64 = 525_600.0;

type Store<V> = DashMap<String, CacheEntry<V>>;

#[derive(Debug)]
struct CacheEntry<V> {
    data: V,
    created_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > ttl
    }
}

/// Occupancy report for a [`TtlCache`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CacheStats {
    /// Physically stored entries, including expired ones not yet swept.
    pub size: usize,
    /// Configured entry lifetime in minutes.
    pub ttl_minutes: f64,
}

/// In-memory key/value cache with a fixed per-entry TTL.
///
/// Expired entries are dropped lazily when read and eagerly by a background
/// sweep that runs once per TTL period. The global `caching.enabled` toggle
/// is read from the [`ConfigHandle`] on every `get` and `set`.
///
/// The sweep task is aborted by [`TtlCache::stop`] or when the cache is
/// dropped. Construction must happen inside a tokio runtime.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Arc<Store<V>>,
    ttl: Duration,
    ttl_minutes: f64,
    config: ConfigHandle,
    sweeper: JoinHandle<()>,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache whose entries live for `ttl_minutes` (fractions allowed).
    ///
    /// Negative or non-finite values are treated as zero; values above
    /// [`MAX_TTL_MINUTES`] are clamped to it.
    pub fn new(ttl_minutes: f64, config: ConfigHandle) -> Self {
        let ttl_minutes =
            if ttl_minutes.is_finite() && ttl_minutes > 0.0 { ttl_minutes.min(MAX_TTL_MINUTES) } else { 0.0 };
        let ttl = Duration::from_secs_f64(ttl_minutes * 60.0);

        let entries: Arc<Store<V>> = Arc::new(DashMap::new());
        let sweeper = tokio::spawn(sweep_loop(Arc::downgrade(&entries), ttl));

        tracing::debug!(ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX), "cache created");

        Self { entries, ttl, ttl_minutes, config, sweeper }
    }

    /// Look up `key`, dropping it if it has outlived the TTL.
    pub fn get(&self, key: &str) -> Option<V> {
        if !self.config.caching_enabled() {
            return None;
        }

        {
            let entry = self.entries.get(key)?;
            if !entry.is_expired(self.ttl, Instant::now()) {
                return Some(entry.data.clone());
            }
        }

        // re-checked under the shard lock; a concurrent `set` may have refreshed it
        self.entries
            .remove_if(key, |_, entry| entry.is_expired(self.ttl, Instant::now()));
        None
    }

    /// Insert or overwrite `key`. Does nothing while caching is disabled.
    pub fn set(&self, key: impl Into<String>, value: V) {
        if !self.config.caching_enabled() {
            return;
        }

        self.entries
            .insert(key.into(), CacheEntry { data: value, created_at: Instant::now() });
    }

    /// Remove every entry, whatever the enable toggle says.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats { size: self.entries.len(), ttl_minutes: self.ttl_minutes }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cancel the background sweep. Lazy expiry on read keeps working.
    pub fn stop(&self) {
        self.sweeper.abort();
    }
}

impl<V> Drop for TtlCache<V> {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}

/// Delete every entry older than `ttl`, returning how many were removed.
fn sweep<V>(entries: &Store<V>, ttl: Duration) -> usize {
    let now = Instant::now();
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(ttl, now));
    before.saturating_sub(entries.len())
}

async fn sweep_loop<V>(entries: Weak<Store<V>>, ttl: Duration)
where
    V: Send + Sync + 'static,
{
    let period = ttl.max(MIN_SWEEP_PERIOD);
    let now = Instant::now();
    let start = now.checked_add(period).unwrap_or(now);
    let mut ticker = tokio::time::interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(entries) = entries.upgrade() else {
            break;
        };
        let removed = sweep(&entries, ttl);
        if removed > 0 {
            tracing::debug!(removed, remaining = entries.len(), "swept expired cache entries");
        }
    }
}
