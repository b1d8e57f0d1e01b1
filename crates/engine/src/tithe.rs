//! Tithe derivation rules.
//!
//! Every income whose source is not [`IncomeSource::Adjustment`] and whose
//! amount is positive owns exactly one tithe: an expense in the reserved
//! [`TITHE_CATEGORY`], worth [`TITHE_PERCENT`]% of the income, dated like the
//! income, already paid and linked back through `source_income_id`.
//!
//! The helpers here are shared by the single-record managers and the bulk
//! coordinator so both apply the same predicates.

use chrono::{DateTime, Utc};

use crate::{Expense, ExpenseStatus, Income, IncomeSource, MoneyCents, ResultEngine, expense};

/// Category reserved for derived records.
pub const TITHE_CATEGORY: &str = "Tithe";

/// Share of an income owed as tithe.
pub const TITHE_PERCENT: u8 = 10;

/// Whether an income with this source and amount owns a tithe.
pub fn qualifies(source: IncomeSource, amount: MoneyCents) -> bool {
    source != IncomeSource::Adjustment && amount.is_positive()
}

pub fn tithe_amount(amount: MoneyCents) -> MoneyCents {
    amount.percent(TITHE_PERCENT)
}

pub fn tithe_description(source: IncomeSource) -> String {
    format!("{TITHE_CATEGORY} - {source}")
}

/// Derived records cannot be deleted or status-changed directly.
pub fn is_protected(model: &expense::Model) -> bool {
    model.source_income_id.is_some()
}

/// Build the tithe owned by `income`.
pub(crate) fn build(income: &Income, now: DateTime<Utc>) -> ResultEngine<Expense> {
    Expense::new(
        tithe_description(income.source),
        TITHE_CATEGORY.to_string(),
        tithe_amount(income.amount),
        income.occurred_on,
        false,
        ExpenseStatus::Paid,
        Some(income.id),
        now,
    )
}

/// How an income's source changed across an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceTransition {
    BecameAdjustment,
    LeftAdjustment,
    StayedOrdinary,
    StayedAdjustment,
}

impl SourceTransition {
    pub fn between(previous: IncomeSource, next: IncomeSource) -> Self {
        let was_adjustment = previous == IncomeSource::Adjustment;
        let is_adjustment = next == IncomeSource::Adjustment;
        match (was_adjustment, is_adjustment) {
            (false, true) => Self::BecameAdjustment,
            (true, false) => Self::LeftAdjustment,
            (false, false) => Self::StayedOrdinary,
            (true, true) => Self::StayedAdjustment,
        }
    }
}

/// What happens to the tithe after an income update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitheAction {
    Create,
    Resync,
    Remove,
    Untouched,
}

/// Decide the tithe action for an income update.
///
/// `has_tithe` tells whether the income currently owns a tithe record.
pub fn plan(
    previous: IncomeSource,
    next: IncomeSource,
    next_amount: MoneyCents,
    has_tithe: bool,
) -> TitheAction {
    match SourceTransition::between(previous, next) {
        SourceTransition::BecameAdjustment if has_tithe => TitheAction::Remove,
        SourceTransition::BecameAdjustment => TitheAction::Untouched,
        // A stray tithe left on an adjustment is reused, never duplicated.
        SourceTransition::LeftAdjustment | SourceTransition::StayedOrdinary => {
            match (next_amount.is_positive(), has_tithe) {
                (true, true) => TitheAction::Resync,
                (true, false) => TitheAction::Create,
                (false, true) => TitheAction::Remove,
                (false, false) => TitheAction::Untouched,
            }
        }
        SourceTransition::StayedAdjustment => TitheAction::Untouched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSITIVE: MoneyCents = MoneyCents::new(20_000);

    #[test]
    fn adjustment_never_qualifies() {
        assert!(!qualifies(IncomeSource::Adjustment, POSITIVE));
        assert!(qualifies(IncomeSource::Uber, POSITIVE));
        assert!(qualifies(IncomeSource::NinetyNine, POSITIVE));
        assert!(!qualifies(IncomeSource::Uber, MoneyCents::ZERO));
    }

    #[test]
    fn tithe_is_ten_percent() {
        assert_eq!(tithe_amount(POSITIVE), MoneyCents::new(2_000));
        assert_eq!(tithe_amount(MoneyCents::new(50_000)), MoneyCents::new(5_000));
    }

    #[test]
    fn description_names_the_source() {
        assert_eq!(tithe_description(IncomeSource::IFood), "Tithe - iFood");
        assert_eq!(tithe_description(IncomeSource::NinetyNine), "Tithe - 99");
    }

    #[test]
    fn became_adjustment_removes_existing_tithe() {
        assert_eq!(
            plan(IncomeSource::Uber, IncomeSource::Adjustment, POSITIVE, true),
            TitheAction::Remove
        );
        assert_eq!(
            plan(IncomeSource::Uber, IncomeSource::Adjustment, POSITIVE, false),
            TitheAction::Untouched
        );
    }

    #[test]
    fn left_adjustment_creates_tithe_for_positive_amounts() {
        assert_eq!(
            plan(IncomeSource::Adjustment, IncomeSource::IFood, POSITIVE, false),
            TitheAction::Create
        );
        assert_eq!(
            plan(
                IncomeSource::Adjustment,
                IncomeSource::IFood,
                MoneyCents::ZERO,
                false
            ),
            TitheAction::Untouched
        );
    }

    #[test]
    fn left_adjustment_reuses_stray_tithe() {
        assert_eq!(
            plan(IncomeSource::Adjustment, IncomeSource::Uber, POSITIVE, true),
            TitheAction::Resync
        );
        assert_eq!(
            plan(
                IncomeSource::Adjustment,
                IncomeSource::Uber,
                MoneyCents::ZERO,
                true
            ),
            TitheAction::Remove
        );
    }

    #[test]
    fn stayed_ordinary_resyncs_or_repairs() {
        assert_eq!(
            plan(IncomeSource::Uber, IncomeSource::Other, POSITIVE, true),
            TitheAction::Resync
        );
        assert_eq!(
            plan(IncomeSource::Uber, IncomeSource::Uber, POSITIVE, false),
            TitheAction::Create
        );
        assert_eq!(
            plan(IncomeSource::Uber, IncomeSource::Uber, MoneyCents::ZERO, true),
            TitheAction::Remove
        );
    }

    #[test]
    fn stayed_adjustment_is_untouched() {
        assert_eq!(
            plan(
                IncomeSource::Adjustment,
                IncomeSource::Adjustment,
                POSITIVE,
                false
            ),
            TitheAction::Untouched
        );
    }
}
