/// Hosted catalog API provider
///
/// Fetches the product catalog from the hosted product database over HTTP.
/// Records that fail domain conversion (unknown category, zero price) are
/// skipped with a warning rather than failing the whole fetch.
use chrono::Utc;
use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{ApiCatalogResponse, CatalogSnapshot, Product},
    services::providers::CatalogProvider,
};

pub struct HostedCatalogProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl HostedCatalogProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    fn convert_catalog(&self, locale: &str, payload: ApiCatalogResponse) -> CatalogSnapshot {
        let raw_count = payload.products.len();

        let products: Vec<Product> = payload
            .products
            .into_iter()
            .filter_map(|raw| match Product::try_from(raw) {
                Ok(product) => Some(product),
                Err(reason) => {
                    tracing::warn!(reason = %reason, "Skipping malformed catalog record");
                    None
                }
            })
            .collect();

        if products.len() < raw_count {
            tracing::warn!(
                kept = products.len(),
                skipped = raw_count - products.len(),
                "Some catalog records were dropped during conversion"
            );
        }

        CatalogSnapshot {
            locale: locale.to_string(),
            products,
            cached_at: Utc::now(),
        }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for HostedCatalogProvider {
    async fn fetch_catalog(&self, locale: &str) -> AppResult<CatalogSnapshot> {
        let url = format!("{}/v1/products", self.api_url);

        tracing::debug!(locale = %locale, "Fetching catalog from hosted API");

        let response = self
            .http_client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(&[("locale", locale)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                locale = %locale,
                status = %status,
                body = %body,
                "Hosted catalog request failed"
            );
            return Err(AppError::CatalogUnavailable(format!(
                "catalog API returned status {}: {}",
                status, body
            )));
        }

        let payload: ApiCatalogResponse = response.json().await?;
        let snapshot = self.convert_catalog(locale, payload);

        tracing::info!(
            locale = %locale,
            product_count = snapshot.products.len(),
            provider = "hosted",
            "Catalog fetched"
        );

        Ok(snapshot)
    }

    fn name(&self) -> &'static str {
        "hosted"
    }
}
