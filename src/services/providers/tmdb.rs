/// TMDb (The Movie Database) provider
///
/// Authenticates with an `api_key` query parameter on every call and passes response
/// bodies through untouched.
///
/// Endpoints used:
/// - `trending/{all|movie|tv}/{day|week}`
/// - `discover/{movie|tv}`
/// - `search/{movie|tv|multi}`
/// - `genre/{movie|tv}/list`
/// - `{movie|tv}/{id}`
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::instrument;

use crate::{
    cached,
    db::{CacheKey, CatalogCache},
    error::{AppError, AppResult},
    models::{CatalogScope, FilterSet, MediaReference, MediaType, TimeWindow},
    services::providers::{ensure_positive_page, CatalogProvider},
};

const TRENDING_CACHE_TTL: u64 = 3600; // 1 hour
const GENRES_CACHE_TTL: u64 = 86400; // 24 hours
const DETAILS_CACHE_TTL: u64 = 3600; // 1 hour

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Arc<dyn CatalogCache>,
}

impl TmdbProvider {
    /// Creates a provider whose upstream calls give up after `timeout`
    pub fn new(
        cache: Arc<dyn CatalogCache>,
        api_key: String,
        api_url: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    /// Issues an authenticated GET against `endpoint` and returns the JSON body
    #[instrument(skip(self, params), fields(provider = "tmdb"))]
    async fn fetch(&self, endpoint: &str, params: &[(String, String)]) -> AppResult<Value> {
        let url = format!("{}/{}", self.api_url, endpoint);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!(error = %e, "TMDb request failed");
                AppError::from(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "TMDb returned an error status");
            return Err(AppError::UpstreamUnavailable(format!(
                "TMDb returned status {} for {}",
                status, endpoint
            )));
        }

        let data: Value = response.json().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!(error = %e, "Failed to decode TMDb response");
            AppError::UpstreamUnavailable(format!("Unreadable TMDb response: {}", e))
        })?;

        tracing::debug!("TMDb request completed");

        Ok(data)
    }
}

fn page_param(page: u32) -> (String, String) {
    ("page".to_string(), page.to_string())
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn trending(
        &self,
        scope: CatalogScope,
        window: TimeWindow,
        page: u32,
    ) -> AppResult<Value> {
        let page = ensure_positive_page(page)?;

        cached!(
            self.cache,
            CacheKey::Trending {
                scope,
                window,
                page
            },
            TRENDING_CACHE_TTL,
            async {
                let endpoint = format!("trending/{}/{}", scope, window);
                self.fetch(&endpoint, &[page_param(page)]).await
            }
        )
    }

    async fn discover(&self, media_type: MediaType, filters: &FilterSet) -> AppResult<Value> {
        let endpoint = format!("discover/{}", media_type);
        let data = self.fetch(&endpoint, &filters.to_query_pairs()).await?;

        tracing::info!(
            media_type = %media_type,
            filters = filters.len(),
            provider = "tmdb",
            "Discover completed"
        );

        Ok(data)
    }

    async fn search(
        &self,
        query: &str,
        media_type: Option<MediaType>,
        page: u32,
    ) -> AppResult<Value> {
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Query parameter is required".to_string(),
            ));
        }
        let page = ensure_positive_page(page)?;

        let endpoint = match media_type {
            Some(media_type) => format!("search/{}", media_type),
            None => "search/multi".to_string(),
        };
        let params = [("query".to_string(), query.to_string()), page_param(page)];
        let data = self.fetch(&endpoint, &params).await?;

        tracing::info!(
            query = %query,
            endpoint = %endpoint,
            provider = "tmdb",
            "Search completed"
        );

        Ok(data)
    }

    async fn genres(&self, media_type: MediaType) -> AppResult<Value> {
        cached!(
            self.cache,
            CacheKey::Genres(media_type),
            GENRES_CACHE_TTL,
            async {
                let endpoint = format!("genre/{}/list", media_type);
                self.fetch(&endpoint, &[]).await
            }
        )
    }

    async fn details(&self, reference: MediaReference) -> AppResult<Value> {
        cached!(
            self.cache,
            CacheKey::Details(reference),
            DETAILS_CACHE_TTL,
            async {
                let data = self.fetch(&reference.to_string(), &[]).await?;
                tracing::info!(
                    media = %reference,
                    provider = "tmdb",
                    "Details fetched"
                );
                Ok::<_, AppError>(data)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{cache::MockCatalogCache, InMemoryCache};
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    const TEST_KEY: &str = "test-api-key";

    fn create_test_provider(server: &MockServer, cache: Arc<dyn CatalogCache>) -> TmdbProvider {
        TmdbProvider::new(
            cache,
            TEST_KEY.to_string(),
            server.uri(),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_trending_second_call_served_from_cache() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/trending/all/week"))
            .and(query_param("api_key", TEST_KEY))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [{"id": 550, "media_type": "movie"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = create_test_provider(&server, Arc::new(InMemoryCache::new()));

        let first = provider
            .trending(CatalogScope::All, TimeWindow::Week, 1)
            .await
            .unwrap();
        let second = provider
            .trending(CatalogScope::All, TimeWindow::Week, 1)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first["results"][0]["id"], 550);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis instance"]
    async fn test_trending_second_call_served_from_redis() {
        use crate::db::{create_redis_client, RedisCache};
        use ::redis::AsyncCommands;

        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let client = create_redis_client(&redis_url).unwrap();
        let key = CacheKey::Trending {
            scope: CatalogScope::Movie,
            window: TimeWindow::Day,
            page: 7,
        }
        .to_string();
        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(&key).await.unwrap();

        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/trending/movie/day"))
            .and(query_param("page", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 7,
                "results": [{"id": 603}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = create_test_provider(&server, Arc::new(RedisCache::new(client)));

        let first = provider
            .trending(CatalogScope::Movie, TimeWindow::Day, 7)
            .await
            .unwrap();
        let second = provider
            .trending(CatalogScope::Movie, TimeWindow::Day, 7)
            .await
            .unwrap();

        assert_eq!(first, second);
        let _: () = conn.del(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_trending_distinct_pages_are_cached_separately() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/trending/tv/day"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .expect(2)
            .mount(&server)
            .await;

        let cache = Arc::new(InMemoryCache::new());
        let provider = create_test_provider(&server, cache.clone());

        provider
            .trending(CatalogScope::Tv, TimeWindow::Day, 1)
            .await
            .unwrap();
        provider
            .trending(CatalogScope::Tv, TimeWindow::Day, 2)
            .await
            .unwrap();
        provider
            .trending(CatalogScope::Tv, TimeWindow::Day, 2)
            .await
            .unwrap();

        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_trending_page_zero_is_rejected_without_upstream_call() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let provider = create_test_provider(&server, Arc::new(InMemoryCache::new()));
        let result = provider
            .trending(CatalogScope::All, TimeWindow::Week, 0)
            .await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_discover_is_never_cached() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/discover/movie"))
            .and(query_param("api_key", TEST_KEY))
            .and(query_param("with_genres", "14,878"))
            .and(query_param("vote_average.gte", "7.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .expect(2)
            .mount(&server)
            .await;

        let cache = Arc::new(InMemoryCache::new());
        let provider = create_test_provider(&server, cache.clone());

        let mut filters = FilterSet::new();
        filters.insert("with_genres", "14,878");
        filters.insert("vote_average.gte", 7.0);

        provider.discover(MediaType::Movie, &filters).await.unwrap();
        provider.discover(MediaType::Movie, &filters).await.unwrap();

        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_search_empty_query_is_invalid() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let provider = create_test_provider(&server, Arc::new(InMemoryCache::new()));

        for media_type in [None, Some(MediaType::Movie), Some(MediaType::Tv)] {
            let result = provider.search("", media_type, 1).await;
            assert!(matches!(result, Err(AppError::InvalidInput(_))));
        }
    }

    #[tokio::test]
    async fn test_search_whitespace_query_is_forwarded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/multi"))
            .and(query_param("query", "   "))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .expect(1)
            .mount(&server)
            .await;

        let provider = create_test_provider(&server, Arc::new(InMemoryCache::new()));
        let data = provider.search("   ", None, 3).await.unwrap();

        assert_eq!(data["results"], json!([]));
    }

    #[tokio::test]
    async fn test_search_without_media_type_uses_multi_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/multi"))
            .and(query_param("query", "inception"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": ["multi"]})))
            .expect(1)
            .mount(&server)
            .await;

        let provider = create_test_provider(&server, Arc::new(InMemoryCache::new()));
        let data = provider.search("inception", None, 1).await.unwrap();

        assert_eq!(data["results"][0], "multi");
    }

    #[tokio::test]
    async fn test_search_with_movie_uses_movie_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("query", "inception"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": ["movie"]})))
            .expect(1)
            .mount(&server)
            .await;

        let provider = create_test_provider(&server, Arc::new(InMemoryCache::new()));
        let data = provider
            .search("inception", Some(MediaType::Movie), 1)
            .await
            .unwrap();

        assert_eq!(data["results"][0], "movie");
    }

    #[tokio::test]
    async fn test_genres_cached_for_a_day() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/genre/tv/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "genres": [{"id": 18, "name": "Drama"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = create_test_provider(&server, Arc::new(InMemoryCache::new()));

        let first = provider.genres(MediaType::Tv).await.unwrap();
        let second = provider.genres(MediaType::Tv).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first["genres"][0]["name"], "Drama");
    }

    #[tokio::test]
    async fn test_genres_write_uses_daily_ttl() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/genre/movie/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"genres": []})))
            .expect(1)
            .mount(&server)
            .await;

        let mut cache = MockCatalogCache::new();
        cache.expect_name().return_const("mock");
        cache.expect_get().times(1).returning(|_| None);
        cache
            .expect_set()
            .withf(|key, _, ttl| *key == CacheKey::Genres(MediaType::Movie) && *ttl == 86400)
            .times(1)
            .return_const(());

        let provider = create_test_provider(&server, Arc::new(cache));
        provider.genres(MediaType::Movie).await.unwrap();
    }

    #[tokio::test]
    async fn test_details_cache_hit_skips_upstream() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let mut cache = MockCatalogCache::new();
        cache.expect_name().return_const("mock");
        cache
            .expect_get()
            .times(1)
            .returning(|_| Some(json!({"id": 42, "title": "Cached"})));
        cache.expect_set().never();

        let provider = create_test_provider(&server, Arc::new(cache));
        let data = provider
            .details(MediaReference {
                media_type: MediaType::Movie,
                media_id: 42,
            })
            .await
            .unwrap();

        assert_eq!(data["title"], "Cached");
    }

    #[tokio::test]
    async fn test_details_upstream_500_is_not_cached() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movie/42"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .expect(2)
            .mount(&server)
            .await;

        let cache = Arc::new(InMemoryCache::new());
        let provider = create_test_provider(&server, cache.clone());
        let reference = MediaReference {
            media_type: MediaType::Movie,
            media_id: 42,
        };

        let first = provider.details(reference).await;
        assert!(matches!(first, Err(AppError::UpstreamUnavailable(_))));
        assert!(cache.is_empty().await);

        // Failures are not cached, so the next call goes upstream again
        let second = provider.details(reference).await;
        assert!(matches!(second, Err(AppError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_details_failure_never_writes_cache() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tv/1399"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut cache = MockCatalogCache::new();
        cache.expect_name().return_const("mock");
        cache.expect_get().returning(|_| None);
        cache.expect_set().never();

        let provider = create_test_provider(&server, Arc::new(cache));
        let result = provider
            .details(MediaReference {
                media_type: MediaType::Tv,
                media_id: 1399,
            })
            .await;

        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_upstream_timeout_is_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/genre/movie/list"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"genres": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let provider = TmdbProvider::new(
            Arc::new(InMemoryCache::new()),
            TEST_KEY.to_string(),
            server.uri(),
            Duration::from_millis(50),
        )
        .unwrap();

        let result = provider.genres(MediaType::Movie).await;
        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_unavailable_and_hides_api_key() {
        let provider = TmdbProvider::new(
            Arc::new(InMemoryCache::new()),
            TEST_KEY.to_string(),
            "http://127.0.0.1:1".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();

        let err = provider
            .search("inception", None, 1)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UpstreamUnavailable(_)));
        assert!(!err.to_string().contains(TEST_KEY));
    }

    #[tokio::test]
    async fn test_non_json_body_is_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movie/7"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let cache = Arc::new(InMemoryCache::new());
        let provider = create_test_provider(&server, cache.clone());
        let result = provider
            .details(MediaReference {
                media_type: MediaType::Movie,
                media_id: 7,
            })
            .await;

        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
        assert!(cache.is_empty().await);
    }

    #[test]
    fn test_trailing_slash_trimmed_from_base_url() {
        let provider = TmdbProvider::new(
            Arc::new(InMemoryCache::new()),
            TEST_KEY.to_string(),
            "https://api.themoviedb.org/3/".to_string(),
            Duration::from_secs(10),
        )
        .unwrap();

        assert_eq!(provider.api_url, "https://api.themoviedb.org/3");
        assert_eq!(provider.name(), "tmdb");
    }
}
