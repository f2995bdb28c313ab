//! Per-user archive snapshot cache.
//!
//! Memoizes the archive read for a short TTL so repeated recall calls do not
//! hammer the backing store. This is a deliberate trade of bounded staleness
//! for read throughput: an unexpired entry is served without touching the
//! store, and a write path that knows the archive changed can call
//! [`SnapshotCache::invalidate`] to shrink the staleness window.
//!
//! The map lock is never held across the store fetch, so concurrent misses
//! for one user may each fetch independently; entries are replaced as whole
//! values and the last write wins, which is safe because the fetch is
//! idempotent.

use anyhow::Result;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::ArchiveItem;
use crate::store::ArchiveStore;

struct CacheEntry {
    items: Vec<ArchiveItem>,
    /// Absolute expiry instant, epoch milliseconds.
    expiry: i64,
}

/// One memoized snapshot per user id.
pub struct SnapshotCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl_ms: i64,
    fetch_limit: usize,
}

impl SnapshotCache {
    pub fn new(ttl_secs: u64, fetch_limit: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_ms: ttl_secs as i64 * 1000,
            fetch_limit,
        }
    }

    /// Return the user's corpus, from cache when fresh, otherwise fetched
    /// from the store and cached until `now + TTL`.
    pub async fn snapshot(
        &self,
        user_id: &str,
        store: &dyn ArchiveStore,
    ) -> Result<Vec<ArchiveItem>> {
        let now = Utc::now().timestamp_millis();

        {
            let entries = self.entries.lock().unwrap();
            if let Some(entry) = entries.get(user_id) {
                if entry.expiry > now {
                    tracing::debug!(user = user_id, "recall: using cached archive snapshot");
                    return Ok(entry.items.clone());
                }
            }
        }

        let items = store.fetch_recent(user_id, self.fetch_limit).await?;

        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            user_id.to_string(),
            CacheEntry {
                items: items.clone(),
                expiry: now + self.ttl_ms,
            },
        );

        Ok(items)
    }

    /// Drop the user's entry outright so the next read is a forced refresh.
    /// Intended to be called by the write path after a new capture.
    pub fn invalidate(&self, user_id: &str) {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(user_id).is_some() {
            tracing::info!(user = user_id, "invalidating recall cache");
        }
    }
}
