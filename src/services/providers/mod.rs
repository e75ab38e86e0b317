/// Catalog provider abstraction
///
/// The engine never owns product storage; catalogs arrive through this
/// seam. The hosted provider talks to the product database's HTTP API and
/// the offline provider carries a small built-in list used when the hosted
/// one is unreachable.
use crate::{error::AppResult, models::CatalogSnapshot};

pub mod hosted;
pub mod offline;

pub use hosted::HostedCatalogProvider;
pub use offline::OfflineCatalogProvider;

/// Trait for catalog data sources
///
/// A fetch returns the full candidate set for one locale in a single
/// request-response call; the assembler itself never suspends.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch every candidate product for the given locale
    async fn fetch_catalog(&self, locale: &str) -> AppResult<CatalogSnapshot>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
