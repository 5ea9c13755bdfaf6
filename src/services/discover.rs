use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{FilterSet, MediaType},
    services::providers::CatalogProvider,
};

/// Browse filters as received on the discover query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverParams {
    #[serde(default)]
    pub media_type: MediaType,
    pub genre: Option<String>,
    pub sort_by: Option<String>,
    pub year: Option<String>,
    pub rating_gte: Option<String>,
    pub rating_lte: Option<String>,
    pub page: Option<String>,
}

/// Maps browse parameters onto discovery filter keys, forwarding values as given
pub fn discover_filters(params: &DiscoverParams) -> FilterSet {
    let mut filters = FilterSet::new();

    filters.insert_present("with_genres", params.genre.as_deref());
    filters.insert_present("sort_by", params.sort_by.as_deref());

    let year_key = match params.media_type {
        MediaType::Movie => "primary_release_year",
        MediaType::Tv => "first_air_date_year",
    };
    filters.insert_present(year_key, params.year.as_deref());

    filters.insert_present("vote_average.gte", params.rating_gte.as_deref());
    filters.insert_present("vote_average.lte", params.rating_lte.as_deref());
    filters.insert_present("page", params.page.as_deref());

    filters
}

/// Service function for filtered browsing
pub async fn discover_titles(
    provider: Arc<dyn CatalogProvider>,
    params: &DiscoverParams,
) -> AppResult<Value> {
    let filters = discover_filters(params);
    provider.discover(params.media_type, &filters).await
}
