//! Unified error types for the budgeting engine.
//!
//! Errors fall into three groups: validation errors raised at the mutation
//! boundary before any state change, policy violations rejected synchronously
//! (last-month deletion, duplicate month creation), and adapter failures from
//! the persistence layer, which trigger an in-memory revert at the service
//! layer.

use crate::model::{Category, MonthKey};
use thiserror::Error;

/// Unified error type for all budgeting operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed user input caught before any state change.
    #[error("validation error: {message}")]
    Validation {
        /// Human-readable description of what was rejected
        message: String,
    },

    /// An amount that is negative, NaN, or infinite.
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The offending amount
        amount: f64,
    },

    /// A month key that does not parse as `YYYY-MM`.
    #[error("invalid month key: {value:?}")]
    InvalidMonthKey {
        /// The offending input
        value: String,
    },

    /// A category name outside the closed six-name enumeration.
    #[error("unknown category: {value:?}")]
    UnknownCategory {
        /// The offending input
        value: String,
    },

    /// Attempted to create a month that already exists.
    #[error("month {month} already exists")]
    MonthExists {
        /// The duplicate month key
        month: MonthKey,
    },

    /// The requested month has no record.
    #[error("month {month} not found")]
    MonthNotFound {
        /// The missing month key
        month: MonthKey,
    },

    /// Deleting the sole remaining month is rejected.
    #[error("cannot delete the only remaining budget month")]
    LastMonth,

    /// No subcategory with the given id in the given category.
    #[error("subcategory {id} not found in {category}")]
    SubcategoryNotFound {
        /// Category that was searched
        category: Category,
        /// The missing subcategory id
        id: String,
    },

    /// Manual transaction entry named a subcategory that does not exist.
    #[error("no subcategory named {name:?} in {category}")]
    UnknownSubcategory {
        /// Category that was searched
        category: Category,
        /// The unmatched subcategory name
        name: String,
    },

    /// No transaction with the given id in the month record.
    #[error("transaction {id} not found")]
    TransactionNotFound {
        /// The missing transaction id
        id: String,
    },

    /// Remote store failure.
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Guest-local store I/O failure.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Blob or wire (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
