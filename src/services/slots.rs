use crate::models::{Period, StepCategory};

/// One ordered position in a period's routine.
///
/// `categories` is a preference-ordered candidate list: the assembler
/// fills the slot from the first category with an affordable product,
/// falling back to the first category with any products at all. Every
/// morning slot has a single candidate; the evening treatment slot prefers
/// a dedicated night cream over a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub categories: &'static [StepCategory],
}

const MORNING_SLOTS: &[Slot] = &[
    Slot { categories: &[StepCategory::Cleanser] },
    Slot { categories: &[StepCategory::Toner] },
    Slot { categories: &[StepCategory::Serum] },
    Slot { categories: &[StepCategory::Moisturizer] },
    Slot { categories: &[StepCategory::Sunscreen] },
];

const EVENING_SLOTS: &[Slot] = &[
    Slot { categories: &[StepCategory::Cleanser] },
    Slot { categories: &[StepCategory::Toner] },
    Slot { categories: &[StepCategory::Serum] },
    Slot { categories: &[StepCategory::Moisturizer] },
    Slot { categories: &[StepCategory::NightCream, StepCategory::Mask] },
];

/// Ordered slot list for a period
pub fn slots_for(period: Period) -> &'static [Slot] {
    match period {
        Period::Morning => MORNING_SLOTS,
        Period::Evening => EVENING_SLOTS,
    }
}

/// Whether a product category may appear in the given period.
///
/// Sunscreen is morning-only; night creams and masks are evening-only;
/// everything else applies to both periods.
pub fn applies_to(category: StepCategory, period: Period) -> bool {
    match category {
        StepCategory::Sunscreen => period == Period::Morning,
        StepCategory::NightCream | StepCategory::Mask => period == Period::Evening,
        _ => true,
    }
}
