//! Month lifecycle - creation strategies, selection, and deletion.
//!
//! Per owner, a month key is either absent or present with exactly one
//! record. Creation supports three strategies: `Scratch` starts empty,
//! `Blank` copies the subcategory structure from a source month with every
//! expected amount forced to zero, and `Copy` carries the expected amounts
//! over verbatim. Neither strategy ever copies transactions.

use crate::errors::{Error, Result};
use crate::model::{AllBudgetData, MonthKey, MonthRecord, Subcategory};
use std::borrow::Cow;

/// How a new month's subcategory plan is initialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateStrategy {
    /// Empty subcategory lists for every category
    Scratch,
    /// Source month's structure with every expected amount reset to 0
    Blank,
    /// Source month's structure with expected amounts carried over
    Copy,
}

/// Resolves which present month to copy structure from.
///
/// Order: the explicit `source` if it is present in `data`; else the
/// calendar month immediately preceding `target`; else the most recent
/// present month; else `None` (caller falls back to scratch semantics).
#[must_use]
pub fn resolve_source(
    data: &AllBudgetData,
    target: MonthKey,
    source: Option<MonthKey>,
) -> Option<MonthKey> {
    if let Some(key) = source
        && data.contains_key(&key)
    {
        return Some(key);
    }
    let preceding = target.pred();
    if data.contains_key(&preceding) {
        return Some(preceding);
    }
    data.keys().next_back().copied()
}

/// Creates a new month record under `month`.
///
/// Fails with [`Error::MonthExists`] when the key is already present. For
/// `Blank` and `Copy`, the subcategory structure is deep-copied from the
/// resolved source month with regenerated ids; when no source exists the
/// result degrades to scratch semantics. The new month never has
/// transactions.
pub fn create_month(
    data: &mut AllBudgetData,
    month: MonthKey,
    strategy: CreateStrategy,
    source: Option<MonthKey>,
) -> Result<&MonthRecord> {
    if data.contains_key(&month) {
        return Err(Error::MonthExists { month });
    }

    let record = match strategy {
        CreateStrategy::Scratch => MonthRecord::default(),
        CreateStrategy::Blank | CreateStrategy::Copy => {
            match resolve_source(data, month, source) {
                None => MonthRecord::default(),
                Some(source_key) => {
                    // resolve_source only returns present keys
                    let source_record = data.get(&source_key).ok_or(Error::MonthNotFound {
                        month: source_key,
                    })?;
                    MonthRecord {
                        subcategories: source_record.subcategories.map(|_, subs| {
                            subs.iter()
                                .map(|sub| {
                                    let expected = match strategy {
                                        CreateStrategy::Blank => 0.0,
                                        _ => sub.expected,
                                    };
                                    let mut copy = Subcategory::new(sub.name.clone(), expected);
                                    copy.exclude_from_budget = sub.exclude_from_budget;
                                    copy
                                })
                                .collect()
                        }),
                        transactions: Vec::new(),
                    }
                }
            }
        }
    };

    Ok(data.entry(month).or_insert(record))
}

/// Read-only view of a month.
///
/// An absent month yields a transient empty record for display without
/// materializing anything in `data`.
#[must_use]
pub fn month_view(data: &AllBudgetData, month: MonthKey) -> Cow<'_, MonthRecord> {
    data.get(&month)
        .map_or_else(|| Cow::Owned(MonthRecord::default()), Cow::Borrowed)
}

/// Deletes a month record and all its transactions permanently.
///
/// Rejected with [`Error::LastMonth`] when it would remove the owner's only
/// remaining month, and with [`Error::MonthNotFound`] when the key is
/// absent; in both cases `data` is left untouched. There is no undo.
pub fn delete_month(data: &mut AllBudgetData, month: MonthKey) -> Result<MonthRecord> {
    if !data.contains_key(&month) {
        return Err(Error::MonthNotFound { month });
    }
    if data.len() <= 1 {
        return Err(Error::LastMonth);
    }
    data.remove(&month).ok_or(Error::MonthNotFound { month })
}

/// Present month keys, most recent first - the order month pickers display.
#[must_use]
pub fn available_months(data: &AllBudgetData) -> Vec<MonthKey> {
    data.keys().rev().copied().collect()
}
