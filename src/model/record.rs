//! Budget records - the per-month state the whole engine operates on.
//!
//! A [`MonthRecord`] holds one month's subcategory plan (one ordered list per
//! category) and its transaction log. Aggregates are never stored here; they
//! are always recomputed by [`crate::core::derive`] from the current record.

use crate::model::{Category, CategoryMap, MonthKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A user-defined named bucket within a category, carrying a planned amount.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    /// Opaque unique identifier (uuid v4 string)
    pub id: String,
    /// Display name, unique within its category by convention (advisory -
    /// case-insensitive merge happens on transaction entry)
    pub name: String,
    /// Planned amount for the month, non-negative
    pub expected: f64,
    /// When true, this subcategory's expected amount and its transactions'
    /// actuals are left out of category-level totals, while remaining
    /// visible in detail views
    #[serde(default)]
    pub exclude_from_budget: bool,
}

impl Subcategory {
    /// Creates a subcategory with a freshly generated id.
    #[must_use]
    pub fn new(name: impl Into<String>, expected: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            expected,
            exclude_from_budget: false,
        }
    }
}

/// A realized transaction, owned by exactly one month record.
///
/// The owning month is determined by the calendar month of `date` at creation
/// time and is not re-derived if the date is later edited.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque unique identifier (uuid v4 string); immutable
    pub id: String,
    /// Calendar date of the transaction
    pub date: NaiveDate,
    /// Top-level category, always one of the six canonical names
    pub category: Category,
    /// Subcategory name as recorded at entry time (text, not an id - a later
    /// rename of the subcategory does not rewrite this field)
    pub subcategory: String,
    /// Amount, non-negative; the category determines flow direction
    pub amount: f64,
    /// Free-form note
    pub note: String,
}

/// Input shape for transaction insertion - a [`Transaction`] minus the id.
#[derive(Clone, Debug, PartialEq)]
pub struct NewTransaction {
    /// Calendar date of the transaction
    pub date: NaiveDate,
    /// Top-level category
    pub category: Category,
    /// Subcategory name as entered; canonicalized against the month's
    /// subcategory list on insertion
    pub subcategory: String,
    /// Amount, non-negative
    pub amount: f64,
    /// Free-form note
    pub note: String,
}

impl NewTransaction {
    /// Attaches a freshly generated id, producing a stored transaction.
    #[must_use]
    pub fn into_transaction(self) -> Transaction {
        Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            date: self.date,
            category: self.category,
            subcategory: self.subcategory,
            amount: self.amount,
            note: self.note,
        }
    }
}

/// One month's budget state: the subcategory plan and the transaction log.
///
/// Transactions are kept sorted by date descending; same-date entries are
/// ordered newest-inserted-first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthRecord {
    /// One ordered subcategory list per category
    pub subcategories: CategoryMap<Vec<Subcategory>>,
    /// All transactions dated within this month
    pub transactions: Vec<Transaction>,
}

impl MonthRecord {
    /// Finds a subcategory by exact (case-sensitive) name within a category.
    #[must_use]
    pub fn subcategory_by_name(&self, category: Category, name: &str) -> Option<&Subcategory> {
        self.subcategories[category].iter().find(|s| s.name == name)
    }

    /// Finds a subcategory by case-insensitive name match within a category.
    ///
    /// This is the merge rule for transaction entry: `"rent"` matches an
    /// existing `"Rent"` and the stored transaction takes the canonical
    /// casing.
    #[must_use]
    pub fn subcategory_by_name_ci(&self, category: Category, name: &str) -> Option<&Subcategory> {
        self.subcategories[category]
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Finds a subcategory by id within a category.
    #[must_use]
    pub fn subcategory_by_id(&self, category: Category, id: &str) -> Option<&Subcategory> {
        self.subcategories[category].iter().find(|s| s.id == id)
    }
}

/// All budget data for one owner: month key to month record.
///
/// Keys are unique; the map itself is unordered in spirit - month pickers
/// apply descending order at read time via
/// [`crate::core::lifecycle::available_months`].
pub type AllBudgetData = BTreeMap<MonthKey, MonthRecord>;
