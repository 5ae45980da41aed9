//! Budget mutation operations - subcategory and transaction CRUD.
//!
//! Every function here edits one [`MonthRecord`] in place and validates its
//! input before touching anything, so a returned error always means the
//! record is unchanged. Aggregates are never maintained incrementally: the
//! service layer re-derives everything after each mutation.

use crate::errors::{Error, Result};
use crate::model::{Category, MonthRecord, NewTransaction, Subcategory, Transaction};

/// How a transaction reached the system, which decides what happens when its
/// subcategory name matches nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryMode {
    /// Manual form entry: the subcategory must already exist
    Manual,
    /// AI-assisted entry: an unknown subcategory is auto-created with
    /// `expected = 0`
    Assisted,
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: "subcategory name cannot be empty".to_string(),
        });
    }
    Ok(trimmed)
}

/// Appends a new subcategory with a freshly generated id.
///
/// Duplicate names are not rejected here - callers wanting merge semantics
/// pre-check with [`MonthRecord::subcategory_by_name_ci`].
pub fn add_subcategory(
    record: &mut MonthRecord,
    category: Category,
    name: &str,
    expected: f64,
) -> Result<Subcategory> {
    let name = validate_name(name)?;
    validate_amount(expected)?;

    let sub = Subcategory::new(name, expected);
    record.subcategories[category].push(sub.clone());
    Ok(sub)
}

/// Renames a subcategory by id.
///
/// Existing transactions keep the old name string, so their history stays
/// grouped under it in the per-subcategory detail map.
pub fn rename_subcategory(
    record: &mut MonthRecord,
    category: Category,
    id: &str,
    new_name: &str,
) -> Result<()> {
    let new_name = validate_name(new_name)?.to_string();
    let sub = subcategory_mut(record, category, id)?;
    sub.name = new_name;
    Ok(())
}

/// Removes a subcategory by id.
///
/// Transactions referencing its name are neither deleted nor relinked; they
/// persist with a now-orphaned name string and stay counted in category
/// actuals (fail-open).
pub fn delete_subcategory(record: &mut MonthRecord, category: Category, id: &str) -> Result<()> {
    let subs = &mut record.subcategories[category];
    let before = subs.len();
    subs.retain(|s| s.id != id);
    if subs.len() == before {
        return Err(Error::SubcategoryNotFound {
            category,
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Replaces a subcategory's planned amount.
///
/// Negative input is coerced to 0 at this boundary; NaN and infinities are
/// rejected.
pub fn update_subcategory_expected(
    record: &mut MonthRecord,
    category: Category,
    id: &str,
    amount: f64,
) -> Result<()> {
    if !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    let sub = subcategory_mut(record, category, id)?;
    sub.expected = amount.max(0.0);
    Ok(())
}

/// Flips a subcategory's exclude-from-budget flag.
pub fn toggle_exclude_from_budget(
    record: &mut MonthRecord,
    category: Category,
    id: &str,
) -> Result<()> {
    let sub = subcategory_mut(record, category, id)?;
    sub.exclude_from_budget = !sub.exclude_from_budget;
    Ok(())
}

fn subcategory_mut<'a>(
    record: &'a mut MonthRecord,
    category: Category,
    id: &str,
) -> Result<&'a mut Subcategory> {
    record.subcategories[category]
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| Error::SubcategoryNotFound {
            category,
            id: id.to_string(),
        })
}

/// Inserts a transaction into the record.
///
/// The subcategory name is resolved against the category's list with a
/// case-insensitive exact match; on a match the stored name takes the
/// existing subcategory's canonical casing. With no match, `Manual` entry is
/// rejected ([`Error::UnknownSubcategory`]) while `Assisted` entry
/// auto-creates the subcategory with `expected = 0` - a deliberate
/// difference between the two entry paths.
///
/// The transaction list stays sorted by date descending; same-date entries
/// keep newest-inserted-first order.
pub fn insert_transaction(
    record: &mut MonthRecord,
    new_tx: NewTransaction,
    mode: EntryMode,
) -> Result<Transaction> {
    validate_amount(new_tx.amount)?;
    let mut new_tx = new_tx;
    new_tx.subcategory = validate_name(&new_tx.subcategory)?.to_string();

    let existing = record
        .subcategory_by_name_ci(new_tx.category, &new_tx.subcategory)
        .map(|s| s.name.clone());
    let canonical = match existing {
        Some(name) => name,
        None => match mode {
            EntryMode::Manual => {
                return Err(Error::UnknownSubcategory {
                    category: new_tx.category,
                    name: new_tx.subcategory,
                });
            }
            EntryMode::Assisted => {
                let sub = Subcategory::new(new_tx.subcategory.clone(), 0.0);
                let name = sub.name.clone();
                record.subcategories[new_tx.category].push(sub);
                name
            }
        },
    };

    new_tx.subcategory = canonical;
    let tx = new_tx.into_transaction();
    record.transactions.insert(0, tx.clone());
    sort_transactions(record);
    Ok(tx)
}

/// Replaces a transaction by id and re-sorts the list.
///
/// The transaction stays in this month record even when its date was edited
/// into another calendar month - ownership is fixed at creation.
pub fn update_transaction(record: &mut MonthRecord, tx: Transaction) -> Result<()> {
    validate_amount(tx.amount)?;
    let slot = record
        .transactions
        .iter_mut()
        .find(|t| t.id == tx.id)
        .ok_or_else(|| Error::TransactionNotFound { id: tx.id.clone() })?;
    *slot = tx;
    sort_transactions(record);
    Ok(())
}

/// Removes a transaction by id, returning it.
pub fn remove_transaction(record: &mut MonthRecord, id: &str) -> Result<Transaction> {
    let index = record
        .transactions
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| Error::TransactionNotFound { id: id.to_string() })?;
    Ok(record.transactions.remove(index))
}

/// Stable date-descending sort; equal dates keep their relative order, so a
/// front-inserted transaction stays ahead of older same-date entries.
pub fn sort_transactions(record: &mut MonthRecord) {
    record.transactions.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{new_transaction, record_with_plan};
    use chrono::NaiveDate;

    #[test]
    fn test_add_subcategory_validates_input() {
        let mut record = MonthRecord::default();

        let err = add_subcategory(&mut record, Category::Bills, "   ", 0.0).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));

        let err = add_subcategory(&mut record, Category::Bills, "Rent", -5.0).unwrap_err();
        assert!(matches!(err, Error::InvalidAmount { .. }));

        let sub = add_subcategory(&mut record, Category::Bills, "  Rent ", 2000.0).unwrap();
        assert_eq!(sub.name, "Rent");
        assert_eq!(record.subcategories[Category::Bills].len(), 1);
    }

    #[test]
    fn test_delete_subcategory_keeps_orphaned_transactions() {
        let mut record = record_with_plan(&[(Category::Expenses, "Groceries", 500.0)]);
        let id = record.subcategories[Category::Expenses][0].id.clone();
        insert_transaction(
            &mut record,
            new_transaction(Category::Expenses, "Groceries", 120.5, "2024-03-02"),
            EntryMode::Manual,
        )
        .unwrap();

        delete_subcategory(&mut record, Category::Expenses, &id).unwrap();
        assert!(record.subcategories[Category::Expenses].is_empty());
        assert_eq!(record.transactions.len(), 1);
        assert_eq!(record.transactions[0].subcategory, "Groceries");
    }

    #[test]
    fn test_delete_subcategory_unknown_id() {
        let mut record = record_with_plan(&[(Category::Expenses, "Groceries", 500.0)]);
        let err = delete_subcategory(&mut record, Category::Expenses, "nope").unwrap_err();
        assert!(matches!(err, Error::SubcategoryNotFound { .. }));
    }

    #[test]
    fn test_update_expected_coerces_negative_to_zero() {
        let mut record = record_with_plan(&[(Category::Bills, "Rent", 2000.0)]);
        let id = record.subcategories[Category::Bills][0].id.clone();

        update_subcategory_expected(&mut record, Category::Bills, &id, -100.0).unwrap();
        assert_eq!(record.subcategories[Category::Bills][0].expected, 0.0);

        let err =
            update_subcategory_expected(&mut record, Category::Bills, &id, f64::NAN).unwrap_err();
        assert!(matches!(err, Error::InvalidAmount { .. }));
    }

    #[test]
    fn test_toggle_exclude_flips() {
        let mut record = record_with_plan(&[(Category::Bills, "Rent", 2000.0)]);
        let id = record.subcategories[Category::Bills][0].id.clone();

        toggle_exclude_from_budget(&mut record, Category::Bills, &id).unwrap();
        assert!(record.subcategories[Category::Bills][0].exclude_from_budget);
        toggle_exclude_from_budget(&mut record, Category::Bills, &id).unwrap();
        assert!(!record.subcategories[Category::Bills][0].exclude_from_budget);
    }

    #[test]
    fn test_rename_keeps_transaction_history_under_old_name() {
        let mut record = record_with_plan(&[(Category::Expenses, "Eating Out", 250.0)]);
        let id = record.subcategories[Category::Expenses][0].id.clone();
        insert_transaction(
            &mut record,
            new_transaction(Category::Expenses, "Eating Out", 45.2, "2024-03-05"),
            EntryMode::Manual,
        )
        .unwrap();

        rename_subcategory(&mut record, Category::Expenses, &id, "Restaurants").unwrap();
        assert_eq!(record.subcategories[Category::Expenses][0].name, "Restaurants");
        assert_eq!(record.transactions[0].subcategory, "Eating Out");
    }

    #[test]
    fn test_insert_normalizes_casing_to_existing_subcategory() {
        let mut record = record_with_plan(&[(Category::Bills, "Rent", 2000.0)]);

        let tx = insert_transaction(
            &mut record,
            new_transaction(Category::Bills, "rent", 2000.0, "2024-03-01"),
            EntryMode::Manual,
        )
        .unwrap();

        assert_eq!(tx.subcategory, "Rent");
        // No duplicate subcategory was created.
        assert_eq!(record.subcategories[Category::Bills].len(), 1);
    }

    #[test]
    fn test_manual_insert_rejects_unknown_subcategory() {
        let mut record = MonthRecord::default();
        let before = record.clone();

        let err = insert_transaction(
            &mut record,
            new_transaction(Category::Expenses, "Groceries", 50.0, "2024-03-01"),
            EntryMode::Manual,
        )
        .unwrap_err();

        assert!(matches!(err, Error::UnknownSubcategory { .. }));
        assert_eq!(record, before);
    }

    #[test]
    fn test_assisted_insert_auto_creates_subcategory() {
        let mut record = MonthRecord::default();

        insert_transaction(
            &mut record,
            new_transaction(Category::Expenses, "Groceries", 50.0, "2024-03-01"),
            EntryMode::Assisted,
        )
        .unwrap();

        let sub = record
            .subcategory_by_name(Category::Expenses, "Groceries")
            .unwrap();
        assert_eq!(sub.expected, 0.0);
        assert_eq!(record.transactions.len(), 1);
    }

    #[test]
    fn test_transactions_sorted_date_descending_newest_first_on_ties() {
        let mut record = record_with_plan(&[(Category::Expenses, "Groceries", 500.0)]);

        let first = insert_transaction(
            &mut record,
            new_transaction(Category::Expenses, "Groceries", 10.0, "2024-03-05"),
            EntryMode::Manual,
        )
        .unwrap();
        let second = insert_transaction(
            &mut record,
            new_transaction(Category::Expenses, "Groceries", 20.0, "2024-03-01"),
            EntryMode::Manual,
        )
        .unwrap();
        // Same date as `first`, inserted later: sorts ahead of it.
        let third = insert_transaction(
            &mut record,
            new_transaction(Category::Expenses, "Groceries", 30.0, "2024-03-05"),
            EntryMode::Manual,
        )
        .unwrap();

        let order: Vec<&str> = record.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, [third.id.as_str(), first.id.as_str(), second.id.as_str()]);
    }

    #[test]
    fn test_update_transaction_resorts() {
        let mut record = record_with_plan(&[(Category::Expenses, "Groceries", 500.0)]);
        let early = insert_transaction(
            &mut record,
            new_transaction(Category::Expenses, "Groceries", 10.0, "2024-03-01"),
            EntryMode::Manual,
        )
        .unwrap();
        insert_transaction(
            &mut record,
            new_transaction(Category::Expenses, "Groceries", 20.0, "2024-03-10"),
            EntryMode::Manual,
        )
        .unwrap();

        // Move the early transaction to the end of the month.
        let mut edited = early.clone();
        edited.date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        edited.amount = 12.0;
        update_transaction(&mut record, edited).unwrap();

        assert_eq!(record.transactions[0].id, early.id);
        assert_eq!(record.transactions[0].amount, 12.0);
    }

    #[test]
    fn test_update_unknown_transaction_errors() {
        let mut record = record_with_plan(&[(Category::Expenses, "Groceries", 500.0)]);
        let mut tx = new_transaction(Category::Expenses, "Groceries", 10.0, "2024-03-01")
            .into_transaction();
        tx.id = "missing".to_string();
        let err = update_transaction(&mut record, tx).unwrap_err();
        assert!(matches!(err, Error::TransactionNotFound { .. }));
    }

    #[test]
    fn test_remove_transaction() {
        let mut record = record_with_plan(&[(Category::Expenses, "Groceries", 500.0)]);
        let tx = insert_transaction(
            &mut record,
            new_transaction(Category::Expenses, "Groceries", 10.0, "2024-03-01"),
            EntryMode::Manual,
        )
        .unwrap();

        let removed = remove_transaction(&mut record, &tx.id).unwrap();
        assert_eq!(removed.id, tx.id);
        assert!(record.transactions.is_empty());

        let err = remove_transaction(&mut record, &tx.id).unwrap_err();
        assert!(matches!(err, Error::TransactionNotFound { .. }));
    }
}
