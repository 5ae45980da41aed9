//! Shared test utilities for `ZenithBudget`.
//!
//! This module provides common helper functions for building in-memory
//! records and setting up test stores with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::errors::Result;
use crate::model::{Category, MonthKey, MonthRecord, NewTransaction, Subcategory, Transaction};
use crate::store::RemoteStore;
use chrono::NaiveDate;

/// Parses a `YYYY-MM` literal into a [`MonthKey`].
pub fn month(s: &str) -> MonthKey {
    s.parse().unwrap()
}

/// Builds a month record with the given `(category, name, expected)` plan
/// and no transactions.
pub fn record_with_plan(plan: &[(Category, &str, f64)]) -> MonthRecord {
    let mut record = MonthRecord::default();
    for (category, name, expected) in plan {
        record.subcategories[*category].push(Subcategory::new(*name, *expected));
    }
    record
}

/// Builds a stored transaction with a fixed mid-month date.
///
/// Use [`new_transaction`] when the date matters.
pub fn transaction(category: Category, subcategory: &str, amount: f64) -> Transaction {
    new_transaction(category, subcategory, amount, "2024-03-15").into_transaction()
}

/// Builds insertion input with an explicit `YYYY-MM-DD` date literal.
pub fn new_transaction(
    category: Category,
    subcategory: &str,
    amount: f64,
    date: &str,
) -> NewTransaction {
    NewTransaction {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        category,
        subcategory: subcategory.to_string(),
        amount,
        note: "Test transaction".to_string(),
    }
}

/// Creates an in-memory `SQLite`-backed remote store with both tables
/// initialized. This is the standard setup for all store and service tests.
pub async fn setup_test_store() -> Result<RemoteStore> {
    let store = RemoteStore::connect("sqlite::memory:").await?;
    store.create_tables().await?;
    Ok(store)
}
