use axum::{http::Method, middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{request_id_middleware, request_span, require_caller};

use super::handlers;
use super::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1/catalog", catalog_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(cors),
        )
}

/// Catalog routes under /api/v1/catalog; all require an authenticated caller
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/trending", get(handlers::trending))
        .route("/discover", get(handlers::discover))
        .route("/search", get(handlers::search))
        .route("/genres", get(handlers::genres))
        .route("/details/:media_type/:media_id", get(handlers::details))
        .route("/wizard/recommend", get(handlers::wizard_recommend))
        .route_layer(middleware::from_fn(require_caller))
}
