/// Offline fallback catalog provider
///
/// A small curated product list used when the hosted catalog is
/// unreachable. Assembly still needs a complete candidate set, so every
/// step category is represented at least once.
use chrono::Utc;

use crate::{
    error::AppResult,
    models::{
        BrandKind, BudgetTier, CatalogSnapshot, Product, RegionalRelevance, SkinType, StepCategory,
    },
    services::providers::CatalogProvider,
};

pub struct OfflineCatalogProvider;

impl OfflineCatalogProvider {
    pub fn new() -> Self {
        Self
    }

    fn curated_products() -> Vec<Product> {
        vec![
            Product {
                id: "off-cln-01".to_string(),
                name: "Neem & Turmeric Face Wash".to_string(),
                category: StepCategory::Cleanser,
                skin_types: vec![SkinType::Oily, SkinType::Combination],
                concerns: vec!["acne".to_string(), "excess oil".to_string()],
                benefits: vec!["purifying".to_string()],
                price: 149,
                budget_tier: BudgetTier::Starter,
                relevance: RegionalRelevance::High,
                brand: "Himalaya".to_string(),
                brand_kind: BrandKind::Traditional,
            },
            Product {
                id: "off-cln-02".to_string(),
                name: "Milk Protein Gentle Cleanser".to_string(),
                category: StepCategory::Cleanser,
                skin_types: vec![SkinType::Dry, SkinType::Sensitive, SkinType::Normal],
                concerns: vec!["dryness".to_string()],
                benefits: vec!["hydrating".to_string()],
                price: 225,
                budget_tier: BudgetTier::Starter,
                relevance: RegionalRelevance::Medium,
                brand: "Cetaphil".to_string(),
                brand_kind: BrandKind::Premium,
            },
            Product {
                id: "off-ton-01".to_string(),
                name: "Rose Water Toner".to_string(),
                category: StepCategory::Toner,
                skin_types: vec![SkinType::All],
                concerns: vec!["dullness".to_string()],
                benefits: vec!["refreshing".to_string()],
                price: 120,
                budget_tier: BudgetTier::Starter,
                relevance: RegionalRelevance::High,
                brand: "Forest Essentials".to_string(),
                brand_kind: BrandKind::Traditional,
            },
            Product {
                id: "off-ton-02".to_string(),
                name: "Green Tea Balancing Toner".to_string(),
                category: StepCategory::Toner,
                skin_types: vec![SkinType::Oily, SkinType::Combination],
                concerns: vec!["acne".to_string(), "large pores".to_string()],
                benefits: vec!["oil-control".to_string()],
                price: 349,
                budget_tier: BudgetTier::Essential,
                relevance: RegionalRelevance::Medium,
                brand: "Plum".to_string(),
                brand_kind: BrandKind::Natural,
            },
            Product {
                id: "off-ser-01".to_string(),
                name: "10% Niacinamide Serum".to_string(),
                category: StepCategory::Serum,
                skin_types: vec![SkinType::All],
                concerns: vec!["acne".to_string(), "dark spots".to_string()],
                benefits: vec!["brightening".to_string()],
                price: 399,
                budget_tier: BudgetTier::Essential,
                relevance: RegionalRelevance::High,
                brand: "Minimalist".to_string(),
                brand_kind: BrandKind::Natural,
            },
            Product {
                id: "off-ser-02".to_string(),
                name: "Retinol Renewal Serum".to_string(),
                category: StepCategory::Serum,
                skin_types: vec![SkinType::Normal, SkinType::Dry],
                concerns: vec!["fine lines".to_string(), "wrinkles".to_string()],
                benefits: vec!["anti-aging".to_string()],
                price: 649,
                budget_tier: BudgetTier::Premium,
                relevance: RegionalRelevance::Medium,
                brand: "Olay".to_string(),
                brand_kind: BrandKind::Premium,
            },
            Product {
                id: "off-moi-01".to_string(),
                name: "Aloe Vera Oil-Free Moisturizer".to_string(),
                category: StepCategory::Moisturizer,
                skin_types: vec![SkinType::Oily, SkinType::Combination],
                concerns: vec!["acne".to_string()],
                benefits: vec!["lightweight hydration".to_string()],
                price: 199,
                budget_tier: BudgetTier::Starter,
                relevance: RegionalRelevance::High,
                brand: "Mamaearth".to_string(),
                brand_kind: BrandKind::Natural,
            },
            Product {
                id: "off-moi-02".to_string(),
                name: "Ceramide Barrier Cream".to_string(),
                category: StepCategory::Moisturizer,
                skin_types: vec![SkinType::Dry, SkinType::Sensitive],
                concerns: vec!["dryness".to_string(), "redness".to_string()],
                benefits: vec!["barrier repair".to_string()],
                price: 499,
                budget_tier: BudgetTier::Essential,
                relevance: RegionalRelevance::Medium,
                brand: "Dr. Sheth's".to_string(),
                brand_kind: BrandKind::Natural,
            },
            Product {
                id: "off-sun-01".to_string(),
                name: "SPF 50 Ultra Matte Sunscreen".to_string(),
                category: StepCategory::Sunscreen,
                skin_types: vec![SkinType::All],
                concerns: vec!["tanning".to_string(), "dark spots".to_string()],
                benefits: vec!["sun protection".to_string()],
                price: 299,
                budget_tier: BudgetTier::Starter,
                relevance: RegionalRelevance::High,
                brand: "Lakme".to_string(),
                brand_kind: BrandKind::Traditional,
            },
            Product {
                id: "off-sun-02".to_string(),
                name: "Mineral SPF 40 Lotion".to_string(),
                category: StepCategory::Sunscreen,
                skin_types: vec![SkinType::Sensitive],
                concerns: vec!["redness".to_string()],
                benefits: vec!["sun protection".to_string(), "soothing".to_string()],
                price: 549,
                budget_tier: BudgetTier::Essential,
                relevance: RegionalRelevance::Medium,
                brand: "Aqualogica".to_string(),
                brand_kind: BrandKind::Natural,
            },
            Product {
                id: "off-ngt-01".to_string(),
                name: "Saffron Night Repair Cream".to_string(),
                category: StepCategory::NightCream,
                skin_types: vec![SkinType::All],
                concerns: vec!["dullness".to_string(), "fine lines".to_string()],
                benefits: vec!["anti-aging".to_string(), "overnight repair".to_string()],
                price: 449,
                budget_tier: BudgetTier::Essential,
                relevance: RegionalRelevance::High,
                brand: "Kama Ayurveda".to_string(),
                brand_kind: BrandKind::Traditional,
            },
            Product {
                id: "off-msk-01".to_string(),
                name: "Multani Mitti Clay Mask".to_string(),
                category: StepCategory::Mask,
                skin_types: vec![SkinType::Oily, SkinType::Combination],
                concerns: vec!["acne".to_string(), "excess oil".to_string()],
                benefits: vec!["deep cleansing".to_string()],
                price: 179,
                budget_tier: BudgetTier::Starter,
                relevance: RegionalRelevance::High,
                brand: "Khadi Natural".to_string(),
                brand_kind: BrandKind::Traditional,
            },
        ]
    }
}

impl Default for OfflineCatalogProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CatalogProvider for OfflineCatalogProvider {
    async fn fetch_catalog(&self, locale: &str) -> AppResult<CatalogSnapshot> {
        let products = Self::curated_products();

        tracing::info!(
            locale = %locale,
            product_count = products.len(),
            provider = "offline",
            "Serving built-in fallback catalog"
        );

        Ok(CatalogSnapshot {
            locale: locale.to_string(),
            products,
            cached_at: Utc::now(),
        })
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}
