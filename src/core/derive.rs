//! Budget derivation engine.
//!
//! Pure, side-effect-free functions computing display aggregates from one
//! [`MonthRecord`]. No aggregate is ever stored: every figure here is
//! recomputable from the record alone, and every function is deterministic
//! and idempotent - callable any number of times, in any order, with
//! identical results.

use crate::model::{Category, CategoryMap, MonthRecord};
use std::collections::HashMap;

/// Per-category sum of planned amounts.
///
/// Subcategories with `exclude_from_budget` set are left out. Categories
/// with no subcategories yield 0.
#[must_use]
pub fn expected_amounts(record: &MonthRecord) -> CategoryMap<f64> {
    record.subcategories.map(|_, subs| {
        subs.iter()
            .filter(|s| !s.exclude_from_budget)
            .map(|s| s.expected)
            .sum()
    })
}

/// Per-category sum of realized transaction amounts.
///
/// Each transaction's subcategory is looked up by exact name in its
/// category's list; when the match is excluded from the budget the amount is
/// skipped. A transaction whose subcategory name no longer matches anything
/// (renamed or deleted since entry) is still counted - the category is
/// always known, so the engine fails open rather than dropping real spend.
#[must_use]
pub fn actual_amounts(record: &MonthRecord) -> CategoryMap<f64> {
    let mut totals = CategoryMap::<f64>::default();
    for tx in &record.transactions {
        let excluded = record
            .subcategory_by_name(tx.category, &tx.subcategory)
            .is_some_and(|s| s.exclude_from_budget);
        if excluded {
            continue;
        }
        totals[tx.category] += tx.amount;
    }
    totals
}

/// Transaction amounts grouped by `(category, subcategory name)`.
///
/// Keys are the names recorded on the transactions, independent of whether
/// the name still exists in the subcategory list. A renamed subcategory
/// therefore leaves its history grouped under the old name. Exclusion flags
/// do not apply here - this map feeds detail views, which show everything.
#[must_use]
pub fn actuals_by_subcategory(record: &MonthRecord) -> CategoryMap<HashMap<String, f64>> {
    let mut by_sub = CategoryMap::<HashMap<String, f64>>::default();
    for tx in &record.transactions {
        *by_sub[tx.category]
            .entry(tx.subcategory.clone())
            .or_insert(0.0) += tx.amount;
    }
    by_sub
}

/// Planning-stage residual: expected income minus all expected spending.
///
/// This is the zero-based-budgeting completion signal - the plan is done
/// when it reaches zero.
#[must_use]
pub fn remaining_to_budget(record: &MonthRecord) -> f64 {
    let expected = expected_amounts(record);
    expected[Category::Income] - Category::spending().map(|c| expected[c]).sum::<f64>()
}

/// Cash-flow residual: actual income minus all actual spending.
#[must_use]
pub fn remaining_to_spend(record: &MonthRecord) -> f64 {
    let actual = actual_amounts(record);
    actual[Category::Income] - Category::spending().map(|c| actual[c]).sum::<f64>()
}

/// Progress of actual against expected, as a ratio.
///
/// Returns 0.0 when `expected` is 0 - never NaN or infinity. The ratio can
/// exceed 1.0 when overspent; use [`display_progress`] for clamped gauges.
#[must_use]
pub fn progress_ratio(actual: f64, expected: f64) -> f64 {
    if expected == 0.0 {
        return 0.0;
    }
    actual / expected
}

/// Progress clamped to `[0, 1]` for gauge rendering.
#[must_use]
pub fn display_progress(actual: f64, expected: f64) -> f64 {
    progress_ratio(actual, expected).clamp(0.0, 1.0)
}

/// All derived figures for one month, bundled for a single render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    /// Planned amount per category
    pub expected: CategoryMap<f64>,
    /// Realized amount per category
    pub actual: CategoryMap<f64>,
    /// Realized amounts grouped by subcategory name
    pub actuals_by_subcategory: CategoryMap<HashMap<String, f64>>,
    /// Expected income minus expected spending
    pub remaining_to_budget: f64,
    /// Actual income minus actual spending
    pub remaining_to_spend: f64,
}

impl BudgetSummary {
    /// Derives the full summary from a month record.
    #[must_use]
    pub fn derive(record: &MonthRecord) -> Self {
        Self {
            expected: expected_amounts(record),
            actual: actual_amounts(record),
            actuals_by_subcategory: actuals_by_subcategory(record),
            remaining_to_budget: remaining_to_budget(record),
            remaining_to_spend: remaining_to_spend(record),
        }
    }
}
