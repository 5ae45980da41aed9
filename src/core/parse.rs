//! Wire contract for the external transaction-parsing collaborator.
//!
//! A natural-language entry like "35 bucks on pizza last night" is sent to
//! an external text-classification service along with the month's current
//! subcategory lists; the response is a structured suggestion. The service
//! itself is out of scope here - this module defines the request/response
//! shapes and the acceptance step that treats the response as untrusted
//! input before it may reach
//! [`insert_transaction`](crate::core::mutate::insert_transaction).

use crate::errors::{Error, Result};
use crate::model::{Category, CategoryMap, MonthRecord, NewTransaction, Subcategory};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Request body sent to the parsing collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParseRequest {
    /// The raw natural-language entry
    pub text: String,
    /// The month's current subcategory lists, so the classifier can prefer
    /// existing names
    pub subcategories: CategoryMap<Vec<Subcategory>>,
}

/// Structured suggestion returned by the parsing collaborator.
///
/// Every field is a suggestion only: the caller presents them for editing,
/// and [`accept_suggestion`] validates them before commit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    /// Suggested amount; sign is normalized by the caller via `abs()`
    pub amount: f64,
    /// Suggested category name, expected to be one of the six canonical
    /// names but validated rather than trusted
    pub category: String,
    /// Suggested subcategory name
    pub subcategory: String,
    /// Suggested note text
    pub note: String,
}

/// Validates a parser suggestion against the live month record and converts
/// it into insertable input.
///
/// The amount is sign-normalized and must be finite; the category string
/// must name a canonical category; the subcategory must be non-empty. The
/// result is inserted with
/// [`EntryMode::Assisted`](crate::core::mutate::EntryMode::Assisted), so a
/// subcategory name the record does not know yet is auto-created at
/// insertion time.
pub fn accept_suggestion(
    record: &MonthRecord,
    suggestion: ParsedTransaction,
    date: NaiveDate,
) -> Result<NewTransaction> {
    let amount = suggestion.amount.abs();
    if !amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: suggestion.amount,
        });
    }

    let category: Category = suggestion.category.parse()?;

    let subcategory = suggestion.subcategory.trim();
    if subcategory.is_empty() {
        return Err(Error::Validation {
            message: "parser returned an empty subcategory".to_string(),
        });
    }

    // Prefer the canonical casing when the record already knows the name.
    let subcategory = record
        .subcategory_by_name_ci(category, subcategory)
        .map_or_else(|| subcategory.to_string(), |s| s.name.clone());

    Ok(NewTransaction {
        date,
        category,
        subcategory,
        amount,
        note: suggestion.note,
    })
}
