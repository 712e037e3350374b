//! Bounded-lifetime store for materialized archives.
//!
//! Per-key lifecycle: `unset → stored (TTL running) → expired`. Only
//! `stored` serves content; `expired` is terminal. Records are never
//! regenerated on read: the upstream description may have changed since
//! the manifest was emitted, and regenerating would break the promise that
//! the advertised digest matches the served bytes.

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use moka::sync::Cache;

/// Content type of stored archives (gzip-compressed tar).
pub const GZIP_CONTENT_TYPE: &str = "application/gzip";

/// A finished archive: the exact bytes to serve later and their digest.
#[derive(Debug, Clone)]
pub struct StoredArchive {
    pub bytes: Bytes,
    pub digest: String,
    pub content_type: &'static str,
    pub created_at: DateTime<Utc>,
}

/// Cache key for a package identity / version pair.
pub fn archive_key(identity: &str, version: &str) -> String {
    format!("{identity}@{version}")
}

/// Injected key-value dependency holding materialized archives.
///
/// Implementations must provide atomic per-key put/get. Concurrent writers
/// for the same key may overwrite each other; content is derived
/// deterministically from the same inputs at that point in time, so the
/// last write wins without a compare-and-swap.
pub trait ArchiveStore: Send + Sync {
    fn put(&self, key: String, record: StoredArchive);
    fn get(&self, key: &str) -> Option<StoredArchive>;
}

/// In-process [`ArchiveStore`] with a fixed time-to-live.
///
/// No size bound and no LRU: the validity window is short and clients are
/// expected to fetch the archive right after the manifest.
pub struct MemoryStore {
    cache: Cache<String, StoredArchive>,
}

impl MemoryStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder().time_to_live(ttl).build(),
        }
    }
}

impl ArchiveStore for MemoryStore {
    fn put(&self, key: String, record: StoredArchive) {
        self.cache.insert(key, record);
    }

    fn get(&self, key: &str) -> Option<StoredArchive> {
        self.cache.get(key)
    }
}
