/// A macro to simplify read-through caching of upstream catalog calls.
///
/// This macro checks if a value is present in the cache.
/// If found, it returns the cached value without running the block.
/// If not found, it executes the provided block to compute the value,
/// stores it in the cache, and then returns the computed value.
/// An error from the block is propagated with `?` and nothing is cached.
///
/// # Arguments
/// * `$cache`: Any `CatalogCache` implementation.
/// * `$key`: The `CacheKey` to use for caching the value.
/// * `$ttl`: The time-to-live (TTL) for the cached value in seconds.
/// * `$block`: The future to await if the value is not found in cache.
///
/// # Example
/// ```rust,ignore
/// let genres = cached!(self.cache, CacheKey::Genres(media_type), GENRES_CACHE_TTL, async {
///     self.fetch("genre/movie/list", &[]).await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get(&key).await {
            tracing::debug!(key = %key, backend = $cache.name(), "Catalog cache hit");
            Ok(cached)
        } else {
            // If not in cache, execute the block to compute the value
            let value = $block.await?;
            $cache.set(&key, &value, $ttl).await;
            Ok(value)
        }
    }};
}
