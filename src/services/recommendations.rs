use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{FilterSet, MediaType, PreferenceRecord},
    services::providers::CatalogProvider,
};

/// Sort order every wizard recommendation starts from
pub const DEFAULT_SORT: &str = "popularity.desc";

/// Compiles wizard preferences into discovery filters
///
/// Always starts with `sort_by=popularity.desc` and `page=1`, then adds filters for
/// mood, period, quality, runtime and popularity in that order. Fields without a
/// recognized choice contribute nothing.
pub fn compile_preferences(record: &PreferenceRecord) -> FilterSet {
    let mut filters = FilterSet::new();
    filters.insert("sort_by", DEFAULT_SORT);
    filters.insert("page", 1i64);

    if let Some(mood) = record.mood {
        filters.insert("with_genres", mood.genre_ids());
    }

    if let Some(period) = record.period {
        let (start, end) = period.year_range();
        let field = match record.media_type {
            MediaType::Movie => "primary_release_date",
            MediaType::Tv => "first_air_date",
        };
        filters.insert(format!("{}.gte", field), format!("{}-01-01", start));
        filters.insert(format!("{}.lte", field), format!("{}-12-31", end));
    }

    if let Some(quality) = record.quality {
        filters.insert("vote_average.gte", quality.min_vote_average());
    }

    if let Some(runtime) = record.runtime {
        let (min, max) = runtime.minutes();
        filters.insert("with_runtime.gte", min);
        filters.insert("with_runtime.lte", max);
    }

    if let Some(popularity) = record.popularity {
        filters.insert("vote_count.gte", popularity.min_vote_count());
    }

    filters
}

/// Generates wizard recommendations
///
/// Translates the preference record into discovery filters and runs them against the
/// catalog's discover endpoint for the record's media type.
pub async fn get_recommendations(
    provider: Arc<dyn CatalogProvider>,
    record: &PreferenceRecord,
) -> AppResult<Value> {
    let filters = compile_preferences(record);
    let keys: Vec<&str> = filters.keys().collect();

    tracing::debug!(
        media_type = %record.media_type,
        filters = ?keys,
        "Compiled wizard preferences"
    );

    provider.discover(record.media_type, &filters).await
}
