//! Time-boxed cache for single user records.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::models::user::UserRecord;

struct CacheEntry {
    record: UserRecord,
    cached_at: Instant,
}

/// Read-through cache keyed by user id with a fixed TTL.
///
/// Entries past their TTL are simply ignored; there is no eviction
/// beyond `flush` and overwrites. The freshness comparison against the
/// provider's update timestamp happens at the call site.
pub struct UserCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl UserCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cached record for the id, if present and within the TTL.
    pub async fn get(&self, user_id: &str) -> Option<UserRecord> {
        let entries = self.entries.read().await;
        entries
            .get(user_id)
            .filter(|entry| entry.cached_at.elapsed() < self.ttl)
            .map(|entry| entry.record.clone())
    }

    /// Store a record keyed by its id, replacing any previous entry.
    pub async fn insert(&self, record: UserRecord) {
        let mut entries = self.entries.write().await;
        entries.insert(
            record.id.clone(),
            CacheEntry {
                record,
                cached_at: Instant::now(),
            },
        );
    }

    /// Drop every cached record.
    pub async fn flush(&self) {
        let mut entries = self.entries.write().await;
        let dropped = entries.len();
        entries.clear();
        tracing::info!("Flushed {} cached user records", dropped);
    }
}
