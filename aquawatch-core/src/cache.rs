//! Time-Boxed Fetch Cache for Remote Query Results
//!
//! ## Overview
//!
//! Every remote query the dashboard issues has one of a handful of
//! shapes (latest reading, latest security status, a bounded series).
//! This cache sits in front of the store so repeated renders within a
//! freshness window never hit the network twice.
//!
//! ## Freshness Invariant
//!
//! An entry is valid iff `now - fetched_at < ttl`. An expired entry is
//! *absent*: [`FetchCache::get`] never serves it and never refetches on
//! its own - refresh policy belongs to the pipeline, not the cache.
//!
//! ## Write Ordering
//!
//! The foreground refresh path and the background security poller both
//! write here without any coordination beyond the entry itself. To keep
//! a slow fetch from clobbering a newer one, [`FetchCache::put`] is
//! last-write-wins by `fetched_at`:
//!
//! ```text
//! put(v1, fetched_at=t1)        stored
//! put(v2, fetched_at=t2<t1)     ignored - entry keeps v1
//! put(v3, fetched_at=t3>=t1)    stored
//! ```
//!
//! A single mutex around the key→entry map is enough; contention is one
//! poller plus one user action, and the critical sections are a clone.
//!
//! ## Lifecycle
//!
//! Process-scoped: created at startup, torn down with the process. The
//! key space is small and bounded, so there is no eviction beyond TTL.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::time::Timestamp;

/// Identifies the shape of a remote query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Single most recent sensor reading
    LatestReading,
    /// Single most recent security event
    LatestSecurity,
    /// Up to `limit` most recent sensor readings
    ReadingSeries {
        /// Row limit of the query
        limit: usize,
    },
    /// Up to `limit` most recent security events
    SecuritySeries {
        /// Row limit of the query
        limit: usize,
    },
}

/// A cached query result with its provenance
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The result payload
    pub value: T,
    /// When the fetch that produced `value` completed
    pub fetched_at: Timestamp,
    /// Freshness window
    pub ttl: Duration,
}

impl<T> CacheEntry<T> {
    /// Whether this entry may still be served at `now`
    pub fn is_fresh(&self, now: Timestamp) -> bool {
        now.saturating_sub(self.fetched_at) < self.ttl.as_millis() as u64
    }
}

/// TTL-bounded cache over remote query results
///
/// One cache instance holds one payload type; the dashboard keeps one
/// for reading rows and one for security rows.
#[derive(Debug, Default)]
pub struct FetchCache<T> {
    entries: Mutex<HashMap<QueryKey, CacheEntry<T>>>,
}

impl<T: Clone> FetchCache<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get the cached value for `key` if it is still fresh at `now`
    pub fn get(&self, key: &QueryKey, now: Timestamp) -> Option<T> {
        self.get_entry(key, now).map(|(value, _)| value)
    }

    /// Like [`get`](Self::get), but also reports when the value was fetched
    ///
    /// The pipeline uses the `fetched_at` half to stamp results with
    /// their true staleness rather than the time of the cache hit.
    pub fn get_entry(&self, key: &QueryKey, now: Timestamp) -> Option<(T, Timestamp)> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| (entry.value.clone(), entry.fetched_at))
    }

    /// Store a freshly fetched value
    ///
    /// Returns `false` (and leaves the entry alone) when an existing
    /// entry has a strictly greater `fetched_at` - an out-of-order
    /// completion must not regress the cache.
    pub fn put(&self, key: QueryKey, value: T, fetched_at: Timestamp, ttl: Duration) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = entries.get(&key) {
            if existing.fetched_at > fetched_at {
                log::debug!(
                    "cache put for {key:?} ignored: existing fetched_at {} > {}",
                    existing.fetched_at,
                    fetched_at
                );
                return false;
            }
        }
        entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at,
                ttl,
            },
        );
        true
    }

    /// Expire one entry immediately
    pub fn invalidate(&self, key: &QueryKey) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }

    /// Expire everything, e.g. on an explicit user refresh
    pub fn invalidate_all(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }
}
