use std::collections::HashSet;

use crate::models::{Product, ScanOverride, SkinType, UserProfile};

/// Weights for the suitability scoring factors
///
/// The skin-type weight is deliberately the largest single factor: a
/// skin-type mismatch should never be outweighed by the remaining factors
/// at equal budget/preference/age contributions. Budget shares are held in
/// permille so the threshold comparison stays exact integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Score every product starts from
    pub base: f64,
    /// Full weight for a compatible (or wildcard) skin type
    pub skin_type: f64,
    /// Maximum weight for concern overlap, scaled by match ratio
    pub concern: f64,
    /// Weight when the price stays within the comfortable budget share
    pub budget_comfortable: f64,
    /// Weight when the price stays within the stretch budget share
    pub budget_stretch: f64,
    /// All-or-nothing weight for brand preference alignment
    pub brand: f64,
    /// Age bonus for mature users when the product targets aging
    pub age_mature: f64,
    /// Age bonus applied in every other case
    pub age_default: f64,
    /// Permille of the monthly budget one product may comfortably take
    pub comfortable_share_permille: i64,
    /// Upper permille before the budget factor drops to zero
    pub stretch_share_permille: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: 50.0,
            skin_type: 30.0,
            concern: 25.0,
            budget_comfortable: 20.0,
            budget_stretch: 10.0,
            brand: 15.0,
            age_mature: 10.0,
            age_default: 5.0,
            comfortable_share_permille: 300,
            stretch_share_permille: 500,
        }
    }
}

/// Computes suitability scores for catalog products against a user profile
#[derive(Debug, Clone)]
pub struct ProductScorer {
    weights: ScoringWeights,
}

impl Default for ProductScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductScorer {
    pub fn new() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Scores a product for the given profile in [0, 100].
    ///
    /// A scan override, when present, supersedes the profile's skin type
    /// and widens its concern set for matching; budget and brand preference
    /// always come from the profile. Never fails: a missing profile field
    /// contributes that factor's minimum.
    pub fn score(
        &self,
        product: &Product,
        profile: &UserProfile,
        scan: Option<&ScanOverride>,
    ) -> f64 {
        let mut score = self.weights.base;
        score += self.skin_type_factor(product, profile, scan);
        score += self.concern_factor(product, profile, scan);
        score += self.budget_factor(product, profile);
        score += self.brand_factor(product, profile);
        score += self.age_factor(product, profile);

        score.clamp(0.0, 100.0)
    }

    fn skin_type_factor(
        &self,
        product: &Product,
        profile: &UserProfile,
        scan: Option<&ScanOverride>,
    ) -> f64 {
        match effective_skin_type(profile, scan) {
            Some(skin_type) if product.suits_skin_type(skin_type) => self.weights.skin_type,
            _ => 0.0,
        }
    }

    fn concern_factor(
        &self,
        product: &Product,
        profile: &UserProfile,
        scan: Option<&ScanOverride>,
    ) -> f64 {
        let effective = effective_concerns(profile, scan);
        let product_concerns: HashSet<String> =
            product.concerns.iter().map(|c| c.to_lowercase()).collect();

        let matched = effective
            .iter()
            .filter(|c| product_concerns.contains(*c))
            .count();

        let ratio = matched as f64 / effective.len().max(1) as f64;
        ratio * self.weights.concern
    }

    fn budget_factor(&self, product: &Product, profile: &UserProfile) -> f64 {
        let budget = profile.monthly_budget;
        let price = product.price as i64;

        // Integer permille comparison: a non-positive budget never admits a
        // positive price, which is exactly the lowest-bucket degradation.
        if price * 1000 <= budget * self.weights.comfortable_share_permille {
            self.weights.budget_comfortable
        } else if price * 1000 <= budget * self.weights.stretch_share_permille {
            self.weights.budget_stretch
        } else {
            0.0
        }
    }

    fn brand_factor(&self, product: &Product, profile: &UserProfile) -> f64 {
        if profile.brand_preference.accepts(product.brand_kind) {
            self.weights.brand
        } else {
            0.0
        }
    }

    fn age_factor(&self, product: &Product, profile: &UserProfile) -> f64 {
        if profile.age_bracket.is_mature() && has_anti_aging_benefit(product) {
            self.weights.age_mature
        } else {
            self.weights.age_default
        }
    }
}

/// Skin type used for matching: the scan override wins over the profile
pub fn effective_skin_type(profile: &UserProfile, scan: Option<&ScanOverride>) -> Option<SkinType> {
    scan.and_then(|s| s.skin_type).or(profile.skin_type)
}

/// Concern set used for matching: profile concerns unioned with any scan
/// concerns, lowercased and de-duplicated
pub fn effective_concerns(profile: &UserProfile, scan: Option<&ScanOverride>) -> HashSet<String> {
    profile
        .concerns
        .iter()
        .chain(scan.iter().flat_map(|s| s.concerns.iter()))
        .map(|c| c.to_lowercase())
        .collect()
}

fn has_anti_aging_benefit(product: &Product) -> bool {
    product
        .benefits
        .iter()
        .any(|b| b.to_lowercase().replace([' ', '-', '_'], "").contains("antiaging"))
}
