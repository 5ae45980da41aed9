//! The closed category enumeration and a fixed-size map keyed by it.
//!
//! Budget data is partitioned into six canonical top-level categories. The
//! map type guarantees every category is always present, so lookups can never
//! miss - there is no "category not in the map" edge case anywhere in the
//! engine.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six canonical top-level budget categories.
///
/// `Income` is the single inflow category; the other five are outflow
/// (spending/allocation) categories. The set is closed - user-defined
/// buckets live one level down as [`super::Subcategory`] entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Money coming in (salary, side income)
    Income,
    /// Day-to-day variable spending
    Expenses,
    /// Recurring fixed obligations
    Bills,
    /// Transfers into savings buckets
    Savings,
    /// Transfers into investment accounts
    Investments,
    /// Debt payments
    Debts,
}

impl Category {
    /// All six categories, in canonical display order.
    pub const ALL: [Self; 6] = [
        Self::Income,
        Self::Expenses,
        Self::Bills,
        Self::Savings,
        Self::Investments,
        Self::Debts,
    ];

    /// The canonical name of this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expenses => "Expenses",
            Self::Bills => "Bills",
            Self::Savings => "Savings",
            Self::Investments => "Investments",
            Self::Debts => "Debts",
        }
    }

    /// Whether this is the inflow category.
    #[must_use]
    pub const fn is_income(self) -> bool {
        matches!(self, Self::Income)
    }

    /// The five non-income categories, in canonical order.
    #[must_use]
    pub fn spending() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|c| !c.is_income())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Income" => Ok(Self::Income),
            "Expenses" => Ok(Self::Expenses),
            "Bills" => Ok(Self::Bills),
            "Savings" => Ok(Self::Savings),
            "Investments" => Ok(Self::Investments),
            "Debts" => Ok(Self::Debts),
            other => Err(Error::UnknownCategory {
                value: other.to_string(),
            }),
        }
    }
}

/// A fixed-size map from [`Category`] to `T` with all six entries always
/// present.
///
/// This replaces open string-keyed dictionaries: indexing is total, and the
/// JSON form is an object keyed by the canonical category names, matching the
/// persisted subcategory blob layout. Missing keys deserialize to
/// `T::default()`, which tolerates blobs written before a category existed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct CategoryMap<T> {
    /// Entry for [`Category::Income`]
    #[serde(default)]
    pub income: T,
    /// Entry for [`Category::Expenses`]
    #[serde(default)]
    pub expenses: T,
    /// Entry for [`Category::Bills`]
    #[serde(default)]
    pub bills: T,
    /// Entry for [`Category::Savings`]
    #[serde(default)]
    pub savings: T,
    /// Entry for [`Category::Investments`]
    #[serde(default)]
    pub investments: T,
    /// Entry for [`Category::Debts`]
    #[serde(default)]
    pub debts: T,
}

impl<T> CategoryMap<T> {
    /// Builds a map by evaluating `f` once per category.
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self {
            income: f(Category::Income),
            expenses: f(Category::Expenses),
            bills: f(Category::Bills),
            savings: f(Category::Savings),
            investments: f(Category::Investments),
            debts: f(Category::Debts),
        }
    }

    /// Returns a reference to the entry for `category`.
    #[must_use]
    pub const fn get(&self, category: Category) -> &T {
        match category {
            Category::Income => &self.income,
            Category::Expenses => &self.expenses,
            Category::Bills => &self.bills,
            Category::Savings => &self.savings,
            Category::Investments => &self.investments,
            Category::Debts => &self.debts,
        }
    }

    /// Returns a mutable reference to the entry for `category`.
    pub const fn get_mut(&mut self, category: Category) -> &mut T {
        match category {
            Category::Income => &mut self.income,
            Category::Expenses => &mut self.expenses,
            Category::Bills => &mut self.bills,
            Category::Savings => &mut self.savings,
            Category::Investments => &mut self.investments,
            Category::Debts => &mut self.debts,
        }
    }

    /// Iterates entries in canonical category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Builds a new map by transforming each entry.
    pub fn map<U>(&self, mut f: impl FnMut(Category, &T) -> U) -> CategoryMap<U> {
        CategoryMap::from_fn(|c| f(c, self.get(c)))
    }
}

impl<T> std::ops::Index<Category> for CategoryMap<T> {
    type Output = T;

    fn index(&self, category: Category) -> &T {
        self.get(category)
    }
}

impl<T> std::ops::IndexMut<Category> for CategoryMap<T> {
    fn index_mut(&mut self, category: Category) -> &mut T {
        self.get_mut(category)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_category_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = "Groceries".parse::<Category>().unwrap_err();
        assert!(matches!(err, Error::UnknownCategory { .. }));
    }

    #[test]
    fn test_spending_excludes_income() {
        let spending: Vec<Category> = Category::spending().collect();
        assert_eq!(spending.len(), 5);
        assert!(!spending.contains(&Category::Income));
    }

    #[test]
    fn test_category_map_indexing_is_total() {
        let mut map = CategoryMap::<f64>::default();
        for category in Category::ALL {
            assert_eq!(map[category], 0.0);
        }
        map[Category::Bills] = 42.0;
        assert_eq!(map[Category::Bills], 42.0);
        assert_eq!(map[Category::Income], 0.0);
    }

    #[test]
    fn test_category_map_serializes_with_canonical_keys() {
        let map = CategoryMap::<f64>::from_fn(|c| if c.is_income() { 1.0 } else { 0.0 });
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["Income"], 1.0);
        assert_eq!(json["Debts"], 0.0);
    }

    #[test]
    fn test_category_map_tolerates_missing_keys() {
        // A blob written by the legacy five-category schema omits Investments.
        let json = r#"{"Income": [], "Expenses": [], "Bills": [], "Savings": [], "Debts": []}"#;
        let map: CategoryMap<Vec<String>> = serde_json::from_str(json).unwrap();
        assert!(map[Category::Investments].is_empty());
    }
}
