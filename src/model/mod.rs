//! In-memory entity model for the budgeting engine.
//!
//! These are the shapes the derivation engine and lifecycle manager operate
//! on. They are deliberately independent of the persistence entities in
//! [`crate::entities`]; the store layer translates between the two.

/// Closed category enumeration and the fixed-size map keyed by it
pub mod category;
/// Validated `YYYY-MM` month keys
pub mod month_key;
/// Budget records - subcategories, transactions, and the per-month record
pub mod record;

pub use category::{Category, CategoryMap};
pub use month_key::MonthKey;
pub use record::{AllBudgetData, MonthRecord, NewTransaction, Subcategory, Transaction};
