use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelscout_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, CatalogCache, InMemoryCache, RedisCache},
    services::{CatalogProvider, TmdbProvider},
};

const MEMORY_CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelscout_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let cache: Arc<dyn CatalogCache> = match &config.redis_url {
        Some(redis_url) => Arc::new(RedisCache::new(create_redis_client(redis_url)?)),
        None => {
            let cache = InMemoryCache::new();
            cache.spawn_sweeper(MEMORY_CACHE_SWEEP_INTERVAL);
            Arc::new(cache)
        }
    };
    tracing::info!(cache = cache.name(), "Catalog cache ready");

    let provider = TmdbProvider::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        Duration::from_secs(config.upstream_timeout_secs),
    )?;
    tracing::info!(
        provider = provider.name(),
        api_url = %config.tmdb_api_url,
        "Catalog provider configured"
    );

    let state = AppState::new(Arc::new(provider));
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
