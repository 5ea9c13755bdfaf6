use serde_json::Value;
use std::fmt::Display;

use crate::models::{CatalogScope, MediaReference, MediaType, TimeWindow};

/// Logical identity of a cacheable catalog query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Trending {
        scope: CatalogScope,
        window: TimeWindow,
        page: u32,
    },
    Genres(MediaType),
    Details(MediaReference),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Trending {
                scope,
                window,
                page,
            } => write!(f, "trending:{}:{}:{}", scope, window, page),
            CacheKey::Genres(media_type) => write!(f, "genres:{}", media_type),
            CacheKey::Details(reference) => {
                write!(f, "details:{}:{}", reference.media_type, reference.media_id)
            }
        }
    }
}

/// Key-value store with per-entry TTL fronting the upstream catalog.
///
/// Backend failures are logged by the implementation and surface as a miss;
/// they never fail the request being served.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogCache: Send + Sync {
    /// Returns the cached payload if present and not expired
    async fn get(&self, key: &CacheKey) -> Option<Value>;

    /// Stores `value` for `ttl` seconds, overwriting any existing entry
    async fn set(&self, key: &CacheKey, value: &Value, ttl: u64);

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
