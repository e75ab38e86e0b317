use std::cmp::Ordering;

use thiserror::Error;

use crate::models::{
    Period, Product, Routine, RoutineStep, ScanOverride, ScoredProduct, UserProfile,
};
use crate::services::scoring::ProductScorer;
use crate::services::slots::{slots_for, Slot};

/// The two periods split the monthly budget evenly up front. A deliberate
/// simplification, not a joint optimization.
const PERIOD_BUDGET_SPLIT: i64 = 2;

/// Error types for routine edit operations
#[derive(Debug, Error)]
pub enum RoutineEditError {
    #[error("slot index {index} out of range for the {period} routine")]
    SlotOutOfRange { period: Period, index: usize },
}

/// Assembles a two-period routine from a catalog and a user profile.
///
/// Greedy per-slot assignment under a running per-period budget: each slot
/// takes the most regionally relevant affordable product (cheapest within
/// equal relevance), falls back to the cheapest in-category product when
/// nothing fits the remaining budget, and is omitted only when the catalog
/// has no products for any of its candidate categories.
pub struct RoutineAssembler<'a> {
    catalog: &'a [Product],
    profile: &'a UserProfile,
    scan: Option<&'a ScanOverride>,
    scorer: ProductScorer,
}

impl<'a> RoutineAssembler<'a> {
    pub fn new(
        catalog: &'a [Product],
        profile: &'a UserProfile,
        scan: Option<&'a ScanOverride>,
    ) -> Self {
        Self {
            catalog,
            profile,
            scan,
            scorer: ProductScorer::new(),
        }
    }

    /// Builds the routine. Infallible: an empty catalog yields an empty
    /// routine with zero cost, and budget shortfalls are absorbed by the
    /// cheapest-fallback rule rather than raised.
    pub fn assemble(&self) -> Routine {
        // Fresh scoring pass per call; profile or catalog may have changed
        // since the last one.
        let scored: Vec<ScoredProduct> = self
            .catalog
            .iter()
            .map(|product| ScoredProduct {
                product: product.clone(),
                score: self.scorer.score(product, self.profile, self.scan),
            })
            .collect();

        let morning = self.fill_period(&scored, Period::Morning);
        let evening = self.fill_period(&scored, Period::Evening);

        let total_cost = morning
            .iter()
            .chain(evening.iter())
            .map(|step| step.product.price)
            .sum();

        let routine = Routine {
            morning,
            evening,
            total_cost,
        };

        tracing::info!(
            catalog_size = self.catalog.len(),
            morning_steps = routine.morning.len(),
            evening_steps = routine.evening.len(),
            total_cost = routine.total_cost,
            budget = self.profile.monthly_budget,
            "Routine assembled"
        );

        routine
    }

    fn fill_period(&self, scored: &[ScoredProduct], period: Period) -> Vec<RoutineStep> {
        let mut remaining = self.profile.monthly_budget / PERIOD_BUDGET_SPLIT;
        let mut steps = Vec::new();

        for slot in slots_for(period) {
            let Some(choice) = select_for_slot(scored, slot, remaining) else {
                tracing::debug!(
                    period = %period,
                    slot = ?slot.categories,
                    "No catalog products for slot, omitting"
                );
                continue;
            };

            if (choice.product.price as i64) > remaining {
                tracing::debug!(
                    period = %period,
                    product_id = %choice.product.id,
                    price = choice.product.price,
                    remaining,
                    "Slot over budget, took cheapest fallback"
                );
            }

            // Deduct even when the fallback drove the counter negative.
            remaining -= choice.product.price as i64;

            steps.push(RoutineStep {
                label: format!("{}. {}", steps.len() + 1, choice.product.category),
                product: choice.product.clone(),
                completed: false,
            });
        }

        steps
    }
}

/// Picks a product for one slot, walking the slot's candidate categories in
/// preference order. A category only wins on the first pass when it has an
/// affordable product, so an unaffordable night cream yields to an
/// affordable mask. The second pass takes the cheapest product from the
/// first non-empty category; a routine never drops a slot just to stay
/// under budget. Returns `None` only when no candidate category has any
/// products at all.
fn select_for_slot<'a>(
    scored: &'a [ScoredProduct],
    slot: &Slot,
    remaining: i64,
) -> Option<&'a ScoredProduct> {
    for category in slot.categories {
        let affordable = scored
            .iter()
            .filter(|sp| sp.product.category == *category)
            .filter(|sp| (sp.product.price as i64) <= remaining)
            .min_by(|a, b| preferred_order(a, b));

        if affordable.is_some() {
            return affordable;
        }
    }

    for category in slot.categories {
        let fallback = scored
            .iter()
            .filter(|sp| sp.product.category == *category)
            .min_by(|a, b| cheapest_order(a, b));

        if fallback.is_some() {
            return fallback;
        }
    }

    None
}

/// Ordering for the affordable path: regional relevance descending, then
/// price ascending, then score descending, then id ascending. The trailing
/// keys keep selection deterministic on exact ties.
fn preferred_order(a: &ScoredProduct, b: &ScoredProduct) -> Ordering {
    b.product
        .relevance
        .cmp(&a.product.relevance)
        .then_with(|| a.product.price.cmp(&b.product.price))
        .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
        .then_with(|| a.product.id.cmp(&b.product.id))
}

/// Ordering for the over-budget fallback: cheapest first, then the same
/// relevance/score/id keys.
fn cheapest_order(a: &ScoredProduct, b: &ScoredProduct) -> Ordering {
    a.product
        .price
        .cmp(&b.product.price)
        .then_with(|| b.product.relevance.cmp(&a.product.relevance))
        .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
        .then_with(|| a.product.id.cmp(&b.product.id))
}

/// Replaces the product at one slot and returns a new routine with the
/// total recomputed from scratch. No budget re-validation: the user has
/// explicitly overridden the choice.
pub fn swap(
    routine: &Routine,
    period: Period,
    slot_index: usize,
    new_product: Product,
) -> Result<Routine, RoutineEditError> {
    let mut updated = routine.clone();

    let steps = match period {
        Period::Morning => &mut updated.morning,
        Period::Evening => &mut updated.evening,
    };

    let step = steps
        .get_mut(slot_index)
        .ok_or(RoutineEditError::SlotOutOfRange {
            period,
            index: slot_index,
        })?;

    step.label = format!("{}. {}", slot_index + 1, new_product.category);
    step.product = new_product;

    updated.total_cost = updated.cost_of_steps();
    Ok(updated)
}

/// Sets one step's completion flag, producing a new routine value rather
/// than mutating shared state. Total cost is untouched.
pub fn set_completed(
    routine: &Routine,
    period: Period,
    slot_index: usize,
    completed: bool,
) -> Result<Routine, RoutineEditError> {
    let mut updated = routine.clone();

    let steps = match period {
        Period::Morning => &mut updated.morning,
        Period::Evening => &mut updated.evening,
    };

    let step = steps
        .get_mut(slot_index)
        .ok_or(RoutineEditError::SlotOutOfRange {
            period,
            index: slot_index,
        })?;

    step.completed = completed;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AgeBracket, BrandKind, BrandPreference, BudgetTier, RegionalRelevance, SkinType,
        StepCategory,
    };

    fn profile(budget: i64) -> UserProfile {
        UserProfile {
            age_bracket: AgeBracket::Twenties,
            skin_type: Some(SkinType::Oily),
            concerns: vec!["Acne".to_string()],
            monthly_budget: budget,
            brand_preference: BrandPreference::NoPreference,
            locale: "en-IN".to_string(),
            consent: true,
        }
    }

    fn product(
        id: &str,
        category: StepCategory,
        price: u32,
        relevance: RegionalRelevance,
    ) -> Product {
        Product {
            id: id.to_string(),
            name: format!("{} {}", category, id),
            category,
            skin_types: vec![SkinType::All],
            concerns: vec![],
            benefits: vec![],
            price,
            budget_tier: BudgetTier::Starter,
            relevance,
            brand: "Generic".to_string(),
            brand_kind: BrandKind::Traditional,
        }
    }

    /// One affordable product per morning/evening category
    fn full_catalog() -> Vec<Product> {
        vec![
            product("c1", StepCategory::Cleanser, 100, RegionalRelevance::High),
            product("t1", StepCategory::Toner, 100, RegionalRelevance::High),
            product("s1", StepCategory::Serum, 100, RegionalRelevance::High),
            product("m1", StepCategory::Moisturizer, 100, RegionalRelevance::High),
            product("sun1", StepCategory::Sunscreen, 100, RegionalRelevance::High),
            product("n1", StepCategory::NightCream, 100, RegionalRelevance::High),
            product("mask1", StepCategory::Mask, 100, RegionalRelevance::High),
        ]
    }

    #[test]
    fn test_empty_catalog_yields_empty_routine() {
        let prof = profile(500);
        let routine = RoutineAssembler::new(&[], &prof, None).assemble();
        assert!(routine.morning.is_empty());
        assert!(routine.evening.is_empty());
        assert_eq!(routine.total_cost, 0);
    }

    #[test]
    fn test_total_cost_matches_step_prices() {
        let catalog = full_catalog();
        let prof = profile(5000);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();
        assert_eq!(routine.total_cost, routine.cost_of_steps());
        assert_eq!(routine.morning.len(), 5);
        assert_eq!(routine.evening.len(), 5);
    }

    #[test]
    fn test_steps_are_labeled_in_order() {
        let catalog = full_catalog();
        let prof = profile(5000);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();

        let labels: Vec<&str> = routine.morning.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "1. Cleanser",
                "2. Toner",
                "3. Serum",
                "4. Moisturizer",
                "5. Sunscreen"
            ]
        );
        assert!(routine.morning.iter().all(|s| !s.completed));
    }

    #[test]
    fn test_relevance_beats_price_for_affordable_products() {
        // Budget 299: period budget 149, both out of reach except the 89.
        // Matches the reference scenario: a high-relevance 89 cleanser wins
        // over a low-relevance 299 one.
        let catalog = vec![
            product("local", StepCategory::Cleanser, 89, RegionalRelevance::High),
            product("import", StepCategory::Cleanser, 299, RegionalRelevance::Low),
        ];
        let prof = profile(299);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();
        assert_eq!(routine.morning[0].product.id, "local");
    }

    #[test]
    fn test_relevance_outranks_cheaper_low_relevance() {
        let catalog = vec![
            product("cheap-low", StepCategory::Cleanser, 50, RegionalRelevance::Low),
            product("dear-high", StepCategory::Cleanser, 180, RegionalRelevance::High),
        ];
        let prof = profile(400); // period budget 200, both affordable
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();
        assert_eq!(routine.morning[0].product.id, "dear-high");
    }

    #[test]
    fn test_price_breaks_equal_relevance() {
        let catalog = vec![
            product("a", StepCategory::Cleanser, 150, RegionalRelevance::Medium),
            product("b", StepCategory::Cleanser, 90, RegionalRelevance::Medium),
        ];
        let prof = profile(400);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();
        assert_eq!(routine.morning[0].product.id, "b");
    }

    #[test]
    fn test_score_breaks_equal_relevance_and_price() {
        // Same relevance and price; the skin-type match gives one a higher
        // suitability score.
        let mut suits = product("suits", StepCategory::Cleanser, 90, RegionalRelevance::Medium);
        suits.skin_types = vec![SkinType::Oily];
        let mut other = product("aaa", StepCategory::Cleanser, 90, RegionalRelevance::Medium);
        other.skin_types = vec![SkinType::Dry];

        let catalog = vec![other, suits];
        let prof = profile(400);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();
        assert_eq!(routine.morning[0].product.id, "suits");
    }

    #[test]
    fn test_id_breaks_exact_ties() {
        let catalog = vec![
            product("beta", StepCategory::Cleanser, 90, RegionalRelevance::Medium),
            product("alpha", StepCategory::Cleanser, 90, RegionalRelevance::Medium),
        ];
        let prof = profile(400);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();
        assert_eq!(routine.morning[0].product.id, "alpha");
    }

    #[test]
    fn test_over_budget_slot_falls_back_to_cheapest() {
        // Budget 100: period budget 50, yet the sunscreen slot must still
        // be filled with the cheapest option.
        let mut catalog = vec![
            product("sun-dear", StepCategory::Sunscreen, 450, RegionalRelevance::High),
            product("sun-cheap", StepCategory::Sunscreen, 220, RegionalRelevance::Low),
        ];
        catalog.push(product("c1", StepCategory::Cleanser, 40, RegionalRelevance::High));

        let prof = profile(100);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();

        let sunscreen = routine
            .morning
            .iter()
            .find(|s| s.product.category == StepCategory::Sunscreen)
            .expect("sunscreen slot must be filled");
        assert_eq!(sunscreen.product.id, "sun-cheap");
        assert_eq!(sunscreen.product.price, 220);
        assert!((routine.total_cost as i64) > prof.monthly_budget);
        assert!(routine.budget_overage(prof.monthly_budget) > 0);
    }

    #[test]
    fn test_fallback_deduction_drives_counter_negative() {
        // The over-budget cleanser consumes the whole period budget, so the
        // toner slot must also take its fallback.
        let catalog = vec![
            product("c-only", StepCategory::Cleanser, 500, RegionalRelevance::High),
            product("t-cheap", StepCategory::Toner, 60, RegionalRelevance::Low),
            product("t-dear", StepCategory::Toner, 90, RegionalRelevance::High),
        ];
        let prof = profile(200); // period budget 100
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();

        assert_eq!(routine.morning[0].product.id, "c-only");
        // Remaining is -400 by the toner slot: cheapest wins, not relevance.
        assert_eq!(routine.morning[1].product.id, "t-cheap");
    }

    #[test]
    fn test_zero_budget_takes_cheapest_everywhere() {
        let catalog = vec![
            product("c-cheap", StepCategory::Cleanser, 80, RegionalRelevance::Low),
            product("c-dear", StepCategory::Cleanser, 300, RegionalRelevance::High),
        ];
        let prof = profile(0);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();
        assert_eq!(routine.morning[0].product.id, "c-cheap");
    }

    #[test]
    fn test_missing_category_omits_slot() {
        // No night cream and no mask: the evening treatment slot vanishes
        // without a placeholder, leaving one step fewer than configured.
        let catalog: Vec<Product> = full_catalog()
            .into_iter()
            .filter(|p| {
                p.category != StepCategory::Mask && p.category != StepCategory::NightCream
            })
            .collect();
        let prof = profile(5000);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();

        assert_eq!(routine.evening.len(), 4);
        assert!(routine
            .evening
            .iter()
            .all(|s| s.product.category != StepCategory::Mask
                && s.product.category != StepCategory::NightCream));
    }

    #[test]
    fn test_treatment_slot_prefers_night_cream() {
        let catalog = full_catalog();
        let prof = profile(5000);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();
        let treatment = routine.evening.last().unwrap();
        assert_eq!(treatment.product.category, StepCategory::NightCream);
        assert_eq!(treatment.label, "5. Night Cream");
    }

    #[test]
    fn test_affordable_mask_beats_unaffordable_night_cream() {
        // The dedicated treatment exists but does not fit the evening
        // budget, so the affordable mask takes the slot.
        let catalog = vec![
            product("n-dear", StepCategory::NightCream, 900, RegionalRelevance::High),
            product("mask-ok", StepCategory::Mask, 150, RegionalRelevance::Medium),
        ];
        let prof = profile(400); // evening budget 200
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();
        let treatment = routine.evening.last().unwrap();
        assert_eq!(treatment.product.id, "mask-ok");
    }

    #[test]
    fn test_treatment_fallback_prefers_night_cream_category() {
        // Nothing in the treatment slot fits: the fallback still draws from
        // the preferred category, not the cheaper mask.
        let catalog = vec![
            product("n-dear", StepCategory::NightCream, 800, RegionalRelevance::Low),
            product("mask-mid", StepCategory::Mask, 600, RegionalRelevance::High),
        ];
        let prof = profile(400);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();
        let treatment = routine.evening.last().unwrap();
        assert_eq!(treatment.product.id, "n-dear");
    }

    #[test]
    fn test_mask_backfills_missing_night_cream() {
        let catalog: Vec<Product> = full_catalog()
            .into_iter()
            .filter(|p| p.category != StepCategory::NightCream)
            .collect();
        let prof = profile(5000);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();
        let treatment = routine.evening.last().unwrap();
        assert_eq!(treatment.product.category, StepCategory::Mask);
        assert_eq!(treatment.label, "5. Mask");
    }

    #[test]
    fn test_sunscreen_never_appears_in_evening() {
        let catalog = full_catalog();
        let prof = profile(5000);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();
        assert!(routine
            .evening
            .iter()
            .all(|s| s.product.category != StepCategory::Sunscreen));
    }

    #[test]
    fn test_identical_inputs_yield_identical_routines() {
        let catalog = full_catalog();
        let prof = profile(750);
        let first = RoutineAssembler::new(&catalog, &prof, None).assemble();
        let second = RoutineAssembler::new(&catalog, &prof, None).assemble();
        assert_eq!(first, second);
    }

    #[test]
    fn test_budget_is_deducted_per_period() {
        // Each period gets its own half: the evening cleanser re-picks the
        // same product even though the morning already "spent" it.
        let catalog = vec![product(
            "c1",
            StepCategory::Cleanser,
            100,
            RegionalRelevance::High,
        )];
        let prof = profile(400);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();
        assert_eq!(routine.morning.len(), 1);
        assert_eq!(routine.evening.len(), 1);
        assert_eq!(routine.total_cost, 200);
    }

    #[test]
    fn test_swap_recomputes_total_cost() {
        let catalog = full_catalog();
        let prof = profile(5000);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();

        let replacement = product("fancy", StepCategory::Cleanser, 999, RegionalRelevance::Low);
        let swapped = swap(&routine, Period::Morning, 0, replacement).unwrap();

        assert_eq!(swapped.morning[0].product.id, "fancy");
        assert_eq!(swapped.total_cost, swapped.cost_of_steps());
        assert_eq!(
            swapped.total_cost,
            routine.total_cost - 100 + 999
        );
        // The original is untouched.
        assert_eq!(routine.morning[0].product.id, "c1");
    }

    #[test]
    fn test_swap_same_product_keeps_total() {
        let catalog = full_catalog();
        let prof = profile(5000);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();

        let same = routine.morning[0].product.clone();
        let swapped = swap(&routine, Period::Morning, 0, same).unwrap();
        assert_eq!(swapped.total_cost, routine.total_cost);
    }

    #[test]
    fn test_swap_relabels_with_new_category() {
        let catalog = full_catalog();
        let prof = profile(5000);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();

        let mask = product("m-x", StepCategory::Mask, 150, RegionalRelevance::Medium);
        let swapped = swap(&routine, Period::Evening, 4, mask).unwrap();
        assert_eq!(swapped.evening[4].label, "5. Mask");
    }

    #[test]
    fn test_swap_out_of_range_fails() {
        let catalog = full_catalog();
        let prof = profile(5000);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();

        let replacement = product("x", StepCategory::Serum, 100, RegionalRelevance::Low);
        let result = swap(&routine, Period::Morning, 9, replacement);
        assert!(matches!(
            result,
            Err(RoutineEditError::SlotOutOfRange { index: 9, .. })
        ));
    }

    #[test]
    fn test_set_completed_produces_new_value() {
        let catalog = full_catalog();
        let prof = profile(5000);
        let routine = RoutineAssembler::new(&catalog, &prof, None).assemble();

        let updated = set_completed(&routine, Period::Evening, 1, true).unwrap();
        assert!(updated.evening[1].completed);
        assert!(!routine.evening[1].completed);
        assert_eq!(updated.total_cost, routine.total_cost);
    }

    #[test]
    fn test_set_completed_out_of_range_fails() {
        let prof = profile(5000);
        let routine = RoutineAssembler::new(&[], &prof, None).assemble();
        assert!(set_completed(&routine, Period::Morning, 0, true).is_err());
    }
}
