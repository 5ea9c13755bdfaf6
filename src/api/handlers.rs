use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::{Caller, RequestId},
    models::{
        CatalogScope, MediaReference, MediaType, PreferenceParams, PreferenceRecord, TimeWindow,
    },
    services::{
        discover::{discover_titles, DiscoverParams},
        recommendations,
    },
};

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct TrendingParams {
    #[serde(default)]
    pub media_type: CatalogScope,
    #[serde(default)]
    pub time_window: TimeWindow,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    pub media_type: Option<MediaType>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GenresParams {
    #[serde(default)]
    pub media_type: MediaType,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Trending movies/TV shows
pub async fn trending(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<TrendingParams>, AppError>,
) -> AppResult<Json<Value>> {
    let data = state
        .catalog
        .trending(params.media_type, params.time_window, params.page.unwrap_or(1))
        .await?;
    Ok(Json(data))
}

/// Discover movies/TV shows with browse filters
pub async fn discover(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<DiscoverParams>, AppError>,
) -> AppResult<Json<Value>> {
    let data = discover_titles(state.catalog.clone(), &params).await?;
    Ok(Json(data))
}

/// Search for movies/TV shows
pub async fn search(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<SearchParams>, AppError>,
) -> AppResult<Json<Value>> {
    let data = state
        .catalog
        .search(&params.query, params.media_type, params.page.unwrap_or(1))
        .await?;
    Ok(Json(data))
}

/// Genre list for a media type
pub async fn genres(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<GenresParams>, AppError>,
) -> AppResult<Json<Value>> {
    let data = state.catalog.genres(params.media_type).await?;
    Ok(Json(data))
}

/// Details for a single movie/TV show
pub async fn details(
    State(state): State<AppState>,
    WithRejection(Path((media_type, media_id)), _): WithRejection<
        Path<(MediaType, u64)>,
        AppError,
    >,
) -> AppResult<Json<Value>> {
    let reference = MediaReference {
        media_type,
        media_id,
    };
    let data = state.catalog.details(reference).await?;
    Ok(Json(data))
}

/// Recommendation wizard: preference answers compiled into a discover query
pub async fn wizard_recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(caller): Extension<Caller>,
    WithRejection(Query(params), _): WithRejection<Query<PreferenceParams>, AppError>,
) -> AppResult<Json<Value>> {
    let record = PreferenceRecord::from(&params);

    tracing::info!(
        request_id = %request_id,
        caller = %caller,
        media_type = %record.media_type,
        "Processing wizard recommendation"
    );

    let data = recommendations::get_recommendations(state.catalog.clone(), &record).await?;
    Ok(Json(data))
}
