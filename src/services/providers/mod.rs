/// Catalog provider abstraction
///
/// A provider is the single point of contact with an external media catalog. It builds
/// the outbound request, attaches credentials, fronts cacheable queries with a
/// `CatalogCache`, and returns the upstream JSON unmodified.
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogScope, FilterSet, MediaReference, MediaType, TimeWindow},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for external media catalogs
///
/// Every failure to reach the catalog or get a 2xx answer from it resolves to
/// `AppError::UpstreamUnavailable`; callers never see transport errors.
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Trending titles for a time window. Cached.
    async fn trending(
        &self,
        scope: CatalogScope,
        window: TimeWindow,
        page: u32,
    ) -> AppResult<Value>;

    /// Filtered discovery. Filters are forwarded verbatim and results are never cached.
    async fn discover(&self, media_type: MediaType, filters: &FilterSet) -> AppResult<Value>;

    /// Free-text search, scoped to one media type or across all of them
    async fn search(
        &self,
        query: &str,
        media_type: Option<MediaType>,
        page: u32,
    ) -> AppResult<Value>;

    /// Genre list for a media type. Cached.
    async fn genres(&self, media_type: MediaType) -> AppResult<Value>;

    /// Full record for one catalog item. Cached.
    async fn details(&self, reference: MediaReference) -> AppResult<Value>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Pages are 1-based
pub fn ensure_positive_page(page: u32) -> AppResult<u32> {
    if page == 0 {
        return Err(AppError::InvalidInput(
            "page must be a positive integer".to_string(),
        ));
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_page_zero_is_invalid() {
        let err = assert_err!(ensure_positive_page(0));
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_positive_page_passes_through() {
        assert_eq!(assert_ok!(ensure_positive_page(1)), 1);
        assert_eq!(assert_ok!(ensure_positive_page(500)), 500);
    }
}
