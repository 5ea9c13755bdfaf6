use ::redis::AsyncCommands;
use ::redis::Client;
use serde_json::Value;

use crate::db::{CacheKey, CatalogCache};

/// Creates a Redis client for caching
///
/// The client is cheap to clone; connections are multiplexed per operation.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Catalog cache backed by Redis
#[derive(Clone)]
pub struct RedisCache {
    redis_client: Client,
}

impl RedisCache {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }

    async fn write_to_redis(&self, key: &str, value: String, ttl: u64) -> ::redis::RedisResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        conn.set_ex(key, value, ttl).await
    }

    async fn read_from_redis(&self, key: &str) -> ::redis::RedisResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        conn.get(key).await
    }
}

#[async_trait::async_trait]
impl CatalogCache for RedisCache {
    async fn get(&self, key: &CacheKey) -> Option<Value> {
        let key = key.to_string();

        let cached = match self.read_from_redis(&key).await {
            Ok(cached) => cached?,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Redis read failed, treating as cache miss");
                return None;
            }
        };

        match serde_json::from_str(&cached) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Writes before returning, so the next identical request is a hit
    async fn set(&self, key: &CacheKey, value: &Value, ttl: u64) {
        let key = key.to_string();

        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Cache serialization error");
                return;
            }
        };

        if let Err(e) = self.write_to_redis(&key, json, ttl).await {
            tracing::warn!(error = %e, key = %key, "Redis write failed, entry not cached");
        }
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
