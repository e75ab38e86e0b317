use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{BudgetTier, Product, StepCategory},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub category: Option<StepCategory>,
    #[serde(default)]
    pub tier: Option<BudgetTier>,
    #[serde(default)]
    pub locale: Option<String>,
}

/// Handler for browsing the catalog, optionally filtered by step category
/// and budget tier
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CatalogQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let locale = params
        .locale
        .unwrap_or_else(|| state.default_locale.clone());

    let products: Vec<Product> = state
        .catalog
        .products(&locale)
        .await?
        .into_iter()
        .filter(|p| params.category.map_or(true, |c| p.category == c))
        .filter(|p| params.tier.map_or(true, |t| p.budget_tier == t))
        .collect();

    Ok(Json(products))
}
