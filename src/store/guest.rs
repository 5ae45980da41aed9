//! Guest-local blob store.
//!
//! Guest sessions never touch the remote store: the entire budget mapping is
//! serialized as one JSON blob at a fixed path on the device. First use
//! seeds a two-month demo dataset so the application is explorable without
//! an account.

use crate::errors::Result;
use crate::model::{
    AllBudgetData, Category, MonthKey, MonthRecord, NewTransaction, Subcategory, Transaction,
};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Local single-blob store for the guest identity.
#[derive(Clone, Debug)]
pub struct GuestStore {
    path: PathBuf,
}

impl GuestStore {
    /// Builds a store persisting at `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads the stored budget mapping, or `None` when nothing has been
    /// saved yet.
    pub fn load(&self) -> Result<Option<AllBudgetData>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Serializes and writes the whole budget mapping.
    pub fn save(&self, data: &AllBudgetData) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(data)?)?;
        Ok(())
    }

    /// Writes the demo dataset and returns it. Called on first guest use.
    pub fn seed(&self) -> Result<AllBudgetData> {
        let data = demo_data(MonthKey::current());
        self.save(&data)?;
        info!(months = data.len(), "seeded guest demo data");
        Ok(data)
    }
}

// Day numbers in the demo stay <= 28, valid in every month.
fn day(month: MonthKey, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(month.year(), month.month(), day).unwrap_or_default()
}

fn tx(
    date: NaiveDate,
    category: Category,
    subcategory: &str,
    amount: f64,
    note: &str,
) -> Transaction {
    NewTransaction {
        date,
        category,
        subcategory: subcategory.to_string(),
        amount,
        note: note.to_string(),
    }
    .into_transaction()
}

fn demo_plan() -> MonthRecord {
    let mut record = MonthRecord::default();
    let plan: [(Category, &str, f64); 13] = [
        (Category::Income, "Salary", 5000.0),
        (Category::Expenses, "Groceries", 500.0),
        (Category::Expenses, "Eating Out", 250.0),
        (Category::Expenses, "Gas", 150.0),
        (Category::Expenses, "Shopping", 200.0),
        (Category::Bills, "Rent", 2000.0),
        (Category::Bills, "Internet", 60.0),
        (Category::Bills, "Phone", 90.0),
        (Category::Bills, "Utilities", 150.0),
        (Category::Savings, "Vacation Fund", 300.0),
        (Category::Savings, "Emergency Fund", 250.0),
        (Category::Investments, "Brokerage", 200.0),
        (Category::Debts, "Student Loan", 300.0),
    ];
    for (category, name, expected) in plan {
        record.subcategories[category].push(Subcategory::new(name, expected));
    }
    record
}

/// Builds the two-month demo dataset: a fully lived-in previous month and a
/// current month that has just started.
#[must_use]
pub fn demo_data(current: MonthKey) -> AllBudgetData {
    let previous = current.pred();

    let mut previous_record = demo_plan();
    previous_record.transactions = vec![
        tx(day(previous, 15), Category::Income, "Salary", 5000.0, "Paycheck"),
        tx(day(previous, 2), Category::Expenses, "Groceries", 120.50, "Trader Joes"),
        tx(day(previous, 5), Category::Expenses, "Eating Out", 45.20, "Pizza night"),
        tx(day(previous, 8), Category::Expenses, "Gas", 55.00, "Shell"),
        tx(day(previous, 12), Category::Expenses, "Shopping", 89.99, "New shoes"),
        tx(day(previous, 16), Category::Expenses, "Groceries", 150.75, "Costco run"),
        tx(day(previous, 22), Category::Expenses, "Eating Out", 80.00, "Dinner with friends"),
        tx(day(previous, 1), Category::Bills, "Rent", 2000.0, "Monthly Rent"),
        tx(day(previous, 10), Category::Bills, "Internet", 60.0, "Comcast"),
        tx(day(previous, 18), Category::Bills, "Phone", 90.0, "Verizon"),
        tx(day(previous, 25), Category::Bills, "Utilities", 145.50, "Power & Water"),
        tx(day(previous, 28), Category::Debts, "Student Loan", 300.0, "Navient Payment"),
        tx(day(previous, 15), Category::Savings, "Vacation Fund", 300.0, "Transfer"),
        tx(day(previous, 15), Category::Savings, "Emergency Fund", 250.0, "Transfer"),
    ];

    let mut current_record = demo_plan();
    current_record.transactions = vec![
        tx(day(current, 1), Category::Bills, "Rent", 2000.0, "Monthly Rent"),
        tx(day(current, 3), Category::Expenses, "Groceries", 95.40, "Safeway"),
    ];

    let mut data = AllBudgetData::new();
    for record in [&mut previous_record, &mut current_record] {
        crate::core::mutate::sort_transactions(record);
    }
    data.insert(previous, previous_record);
    data.insert(current, current_record);
    data
}
