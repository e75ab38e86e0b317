use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use glow_api::config::Config;
use glow_api::db::{create_redis_client, Cache};
use glow_api::routes::{create_router, AppState};
use glow_api::services::providers::{HostedCatalogProvider, OfflineCatalogProvider};
use glow_api::services::CatalogService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    let provider = Arc::new(HostedCatalogProvider::new(
        config.catalog_api_key.clone(),
        config.catalog_api_url.clone(),
    ));
    let fallback = Arc::new(OfflineCatalogProvider::new());
    let catalog = CatalogService::new(cache, provider, fallback);

    let state = Arc::new(AppState {
        catalog,
        default_locale: config.default_locale.clone(),
    });
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Flush pending cache writes before exiting.
    cache_writer.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
