pub mod cache;
pub mod memory;
pub mod redis;

mod macros;

pub use cache::{CacheKey, CatalogCache};
pub use memory::InMemoryCache;
pub use self::redis::{create_redis_client, RedisCache};
