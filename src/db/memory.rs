use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::{CacheKey, CatalogCache};

/// A cached upstream payload and the instant it stops being served
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-process catalog cache, used when no Redis URL is configured
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until they are purged
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drops every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Spawns a background task that purges expired entries every `interval`
    pub fn spawn_sweeper(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let removed = cache.purge_expired().await;
                if removed > 0 {
                    tracing::debug!(removed, "Purged expired catalog cache entries");
                }
            }
        })
    }
}

#[async_trait::async_trait]
impl CatalogCache for InMemoryCache {
    async fn get(&self, key: &CacheKey) -> Option<Value> {
        let key = key.to_string();
        let now = Utc::now();

        {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(&key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(&key);
        }
        None
    }

    async fn set(&self, key: &CacheKey, value: &Value, ttl: u64) {
        let expires_at = i64::try_from(ttl)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let entry = CacheEntry {
            value: value.clone(),
            expires_at,
        };
        self.entries.write().await.insert(key.to_string(), entry);
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaReference, MediaType};
    use serde_json::json;

    fn details_key(id: u64) -> CacheKey {
        CacheKey::Details(MediaReference {
            media_type: MediaType::Movie,
            media_id: id,
        })
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.get(&details_key(1)).await, None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = InMemoryCache::new();
        let value = json!({"id": 42, "title": "The Hitchhiker's Guide to the Galaxy"});

        cache.set(&details_key(42), &value, 60).await;

        assert_eq!(cache.get(&details_key(42)).await, Some(value));
        assert_eq!(cache.get(&details_key(43)).await, None);
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_entry() {
        let cache = InMemoryCache::new();
        cache.set(&details_key(7), &json!({"v": 1}), 60).await;
        cache.set(&details_key(7), &json!({"v": 2}), 60).await;

        assert_eq!(cache.get(&details_key(7)).await, Some(json!({"v": 2})));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_entry_is_expired_and_evicted_on_read() {
        let cache = InMemoryCache::new();
        cache.set(&details_key(9), &json!({"v": 1}), 0).await;

        assert_eq!(cache.get(&details_key(9)).await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_purge_expired_keeps_live_entries() {
        let cache = InMemoryCache::new();
        cache.set(&details_key(1), &json!(1), 0).await;
        cache.set(&details_key(2), &json!(2), 0).await;
        cache.set(&details_key(3), &json!(3), 3600).await;

        assert_eq!(cache.purge_expired().await, 2);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get(&details_key(3)).await, Some(json!(3)));
    }
}
