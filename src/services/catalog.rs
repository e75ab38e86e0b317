use std::sync::Arc;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{CatalogSnapshot, Product},
    services::providers::CatalogProvider,
};

const CATALOG_CACHE_TTL: u64 = 3600; // 1 hour

/// Service for fetching and caching the product catalog
///
/// Wraps the configured primary provider with a Redis-backed snapshot
/// cache keyed by locale. When the primary fetch fails the service
/// substitutes the fallback provider's catalog and retries assembly with
/// that; only a double failure propagates to the caller.
pub struct CatalogService {
    cache: Cache,
    provider: Arc<dyn CatalogProvider>,
    fallback: Arc<dyn CatalogProvider>,
}

impl CatalogService {
    pub fn new(
        cache: Cache,
        provider: Arc<dyn CatalogProvider>,
        fallback: Arc<dyn CatalogProvider>,
    ) -> Self {
        Self {
            cache,
            provider,
            fallback,
        }
    }

    /// Fetches the catalog snapshot for a locale, checking the cache first.
    /// Fallback snapshots are served directly and never cached, so a
    /// recovered primary is picked up on the next miss.
    pub async fn snapshot(&self, locale: &str) -> AppResult<CatalogSnapshot> {
        let key = CacheKey::Catalog(locale.to_string());

        let primary: AppResult<CatalogSnapshot> = cached!(
            self.cache,
            key,
            CATALOG_CACHE_TTL,
            async { self.provider.fetch_catalog(locale).await }
        );

        match primary {
            Ok(snapshot) => Ok(snapshot),
            Err(primary_err) => {
                tracing::warn!(
                    error = %primary_err,
                    provider = self.provider.name(),
                    fallback = self.fallback.name(),
                    "Catalog fetch failed, substituting fallback catalog"
                );

                self.fallback
                    .fetch_catalog(locale)
                    .await
                    .map_err(|fallback_err| {
                        tracing::error!(
                            primary_error = %primary_err,
                            fallback_error = %fallback_err,
                            "No catalog available from any provider"
                        );
                        AppError::CatalogUnavailable(format!(
                            "{} ({}); fallback {} ({})",
                            self.provider.name(),
                            primary_err,
                            self.fallback.name(),
                            fallback_err
                        ))
                    })
            }
        }
    }

    /// Fetches the product list for a locale
    pub async fn products(&self, locale: &str) -> AppResult<Vec<Product>> {
        Ok(self.snapshot(locale).await?.products)
    }

    /// Resolves a single product by id within a locale's catalog
    pub async fn find_product(&self, locale: &str, product_id: &str) -> AppResult<Product> {
        self.products(locale)
            .await?
            .into_iter()
            .find(|p| p.id == product_id)
            .ok_or_else(|| AppError::NotFound(format!("No product with id {}", product_id)))
    }
}
