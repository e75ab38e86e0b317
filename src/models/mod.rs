use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Skin type classification
///
/// `All` is the product-side wildcard: a product listing `All` is
/// compatible with every skin type. Quiz profiles only ever carry the
/// concrete variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkinType {
    All,
    Normal,
    Oily,
    Dry,
    Combination,
    Sensitive,
}

/// Age bracket selected in the quiz flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBracket {
    Teens,
    Twenties,
    Thirties,
    Forties,
    FiftyPlus,
}

impl AgeBracket {
    /// Brackets where anti-aging benefits get the higher age-relevance bonus
    pub fn is_mature(&self) -> bool {
        matches!(self, AgeBracket::Forties | AgeBracket::FiftyPlus)
    }
}

/// Brand preference declared by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandPreference {
    Traditional,
    Natural,
    Premium,
    NoPreference,
}

/// Brand classification carried by a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandKind {
    Traditional,
    Natural,
    Premium,
}

impl BrandPreference {
    /// Whether a product's brand kind satisfies this preference.
    ///
    /// Traditional and natural users accept each other's brands; premium
    /// users only accept premium brands; no-preference accepts everything.
    pub fn accepts(&self, kind: BrandKind) -> bool {
        match self {
            BrandPreference::Traditional | BrandPreference::Natural => {
                matches!(kind, BrandKind::Traditional | BrandKind::Natural)
            }
            BrandPreference::Premium => matches!(kind, BrandKind::Premium),
            BrandPreference::NoPreference => true,
        }
    }
}

/// How locally appropriate a product/brand is for the user's market.
///
/// Ordering is derived from declaration order: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionalRelevance {
    Low,
    Medium,
    High,
}

/// Minimum monthly budget bracket a product is intended for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    Starter,
    Essential,
    Premium,
    Luxury,
}

impl BudgetTier {
    /// Minimum monthly budget (in rupees) for which the tier is intended
    pub fn min_budget(&self) -> i64 {
        match self {
            BudgetTier::Starter => 299,
            BudgetTier::Essential => 499,
            BudgetTier::Premium => 999,
            BudgetTier::Luxury => 1999,
        }
    }
}

/// Routine step category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepCategory {
    Cleanser,
    Toner,
    Serum,
    Moisturizer,
    Sunscreen,
    NightCream,
    Mask,
}

impl Display for StepCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StepCategory::Cleanser => "Cleanser",
            StepCategory::Toner => "Toner",
            StepCategory::Serum => "Serum",
            StepCategory::Moisturizer => "Moisturizer",
            StepCategory::Sunscreen => "Sunscreen",
            StepCategory::NightCream => "Night Cream",
            StepCategory::Mask => "Mask",
        };
        write!(f, "{}", name)
    }
}

/// Time period of a routine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Morning,
    Evening,
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Morning => write!(f, "morning"),
            Period::Evening => write!(f, "evening"),
        }
    }
}

/// User profile produced by the quiz flow.
///
/// Immutable once submitted; a retake replaces the whole profile rather
/// than patching fields. A missing skin type is tolerated and degrades the
/// skin-type scoring factor instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub age_bracket: AgeBracket,
    #[serde(default)]
    pub skin_type: Option<SkinType>,
    #[serde(default)]
    pub concerns: Vec<String>,
    /// Monthly budget in rupees. Zero or negative is accepted and simply
    /// drives every slot through the cheapest-fallback path.
    pub monthly_budget: i64,
    pub brand_preference: BrandPreference,
    pub locale: String,
    #[serde(default)]
    pub consent: bool,
}

/// Alternate skin reading that supersedes the self-reported profile values
/// for skin-type and concern matching only. Budget and brand preference
/// always come from the profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScanOverride {
    #[serde(default)]
    pub skin_type: Option<SkinType>,
    #[serde(default)]
    pub concerns: Vec<String>,
}

/// A catalog product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: StepCategory,
    /// Compatible skin types; may contain the `All` wildcard
    pub skin_types: Vec<SkinType>,
    /// Concern tags the product addresses
    pub concerns: Vec<String>,
    /// Stated benefits (e.g. "anti-aging", "brightening")
    #[serde(default)]
    pub benefits: Vec<String>,
    /// Price in whole rupees
    pub price: u32,
    pub budget_tier: BudgetTier,
    pub relevance: RegionalRelevance,
    pub brand: String,
    pub brand_kind: BrandKind,
}

impl Product {
    /// Whether the product is compatible with the given skin type
    pub fn suits_skin_type(&self, skin_type: SkinType) -> bool {
        self.skin_types.contains(&SkinType::All) || self.skin_types.contains(&skin_type)
    }
}

/// A product paired with its suitability score for one scoring pass.
///
/// Ephemeral: rebuilt on every assemble call, never cached or persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProduct {
    pub product: Product,
    pub score: f64,
}

/// One filled slot in a routine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutineStep {
    /// Ordinal label, e.g. "1. Cleanser"
    pub label: String,
    pub product: Product,
    pub completed: bool,
}

/// A generated two-period routine.
///
/// `total_cost` always equals the price sum over both step lists; it is
/// recomputed whenever a step's product changes, never hand-edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Routine {
    pub morning: Vec<RoutineStep>,
    pub evening: Vec<RoutineStep>,
    pub total_cost: u32,
}

impl Routine {
    /// Steps for the given period
    pub fn steps(&self, period: Period) -> &[RoutineStep] {
        match period {
            Period::Morning => &self.morning,
            Period::Evening => &self.evening,
        }
    }

    /// Price sum over both periods
    pub fn cost_of_steps(&self) -> u32 {
        self.morning
            .iter()
            .chain(self.evening.iter())
            .map(|step| step.product.price)
            .sum()
    }

    /// How far the routine exceeds the given budget, in rupees.
    ///
    /// Overage is surfaced as data, never as an error; zero means the
    /// routine fits.
    pub fn budget_overage(&self, budget: i64) -> i64 {
        (self.total_cost as i64 - budget).max(0)
    }
}

/// A full catalog fetch for one locale, as cached in Redis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub locale: String,
    pub products: Vec<Product>,
    pub cached_at: DateTime<Utc>,
}

// ============================================================================
// Hosted Catalog API Types
// ============================================================================

/// Raw product record from the hosted catalog API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProduct {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub skin_types: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub price: u32,
    #[serde(default)]
    pub budget_tier: Option<String>,
    #[serde(default)]
    pub regional_relevance: Option<String>,
    pub brand: String,
    #[serde(default)]
    pub brand_kind: Option<String>,
}

/// Response from GET /v1/products
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCatalogResponse {
    pub products: Vec<ApiProduct>,
}

fn parse_category(raw: &str) -> Option<StepCategory> {
    match raw.to_lowercase().replace([' ', '-'], "_").as_str() {
        "cleanser" | "face_wash" => Some(StepCategory::Cleanser),
        "toner" => Some(StepCategory::Toner),
        "serum" => Some(StepCategory::Serum),
        "moisturizer" | "moisturiser" => Some(StepCategory::Moisturizer),
        "sunscreen" | "spf" => Some(StepCategory::Sunscreen),
        "night_cream" | "night_treatment" => Some(StepCategory::NightCream),
        "mask" | "face_mask" => Some(StepCategory::Mask),
        _ => None,
    }
}

fn parse_skin_type(raw: &str) -> Option<SkinType> {
    match raw.to_lowercase().as_str() {
        "all" => Some(SkinType::All),
        "normal" => Some(SkinType::Normal),
        "oily" => Some(SkinType::Oily),
        "dry" => Some(SkinType::Dry),
        "combination" => Some(SkinType::Combination),
        "sensitive" => Some(SkinType::Sensitive),
        _ => None,
    }
}

fn parse_relevance(raw: &str) -> Option<RegionalRelevance> {
    match raw.to_lowercase().as_str() {
        "high" => Some(RegionalRelevance::High),
        "medium" => Some(RegionalRelevance::Medium),
        "low" => Some(RegionalRelevance::Low),
        _ => None,
    }
}

fn parse_budget_tier(raw: &str) -> Option<BudgetTier> {
    match raw.to_lowercase().as_str() {
        "starter" => Some(BudgetTier::Starter),
        "essential" => Some(BudgetTier::Essential),
        "premium" => Some(BudgetTier::Premium),
        "luxury" => Some(BudgetTier::Luxury),
        _ => None,
    }
}

fn parse_brand_kind(raw: &str) -> Option<BrandKind> {
    match raw.to_lowercase().as_str() {
        "traditional" | "ayurvedic" => Some(BrandKind::Traditional),
        "natural" | "organic" => Some(BrandKind::Natural),
        "premium" | "luxury" => Some(BrandKind::Premium),
        _ => None,
    }
}

impl TryFrom<ApiProduct> for Product {
    type Error = String;

    /// Converts a raw catalog record, rejecting records whose category
    /// cannot be mapped. Missing optional fields fall back to the most
    /// conservative reading: no skin types listed means `All`, unknown
    /// relevance means `Low`, unknown tier means `Starter`, unknown brand
    /// kind means `Traditional`.
    fn try_from(raw: ApiProduct) -> Result<Self, Self::Error> {
        let category = parse_category(&raw.category)
            .ok_or_else(|| format!("unknown category '{}' for product {}", raw.category, raw.id))?;

        if raw.price == 0 {
            return Err(format!("product {} has zero price", raw.id));
        }

        let mut skin_types: Vec<SkinType> = raw
            .skin_types
            .iter()
            .filter_map(|s| parse_skin_type(s))
            .collect();
        if skin_types.is_empty() {
            skin_types.push(SkinType::All);
        }

        let relevance = raw
            .regional_relevance
            .as_deref()
            .and_then(parse_relevance)
            .unwrap_or(RegionalRelevance::Low);

        let budget_tier = raw
            .budget_tier
            .as_deref()
            .and_then(parse_budget_tier)
            .unwrap_or(BudgetTier::Starter);

        let brand_kind = raw
            .brand_kind
            .as_deref()
            .and_then(parse_brand_kind)
            .unwrap_or(BrandKind::Traditional);

        Ok(Product {
            id: raw.id,
            name: raw.name,
            category,
            skin_types,
            concerns: raw.concerns,
            benefits: raw.benefits,
            price: raw.price,
            budget_tier,
            relevance,
            brand: raw.brand,
            brand_kind,
        })
    }
}
