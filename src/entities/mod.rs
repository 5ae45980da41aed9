//! `SeaORM` entity definitions for the remote store tables.
//!
//! Two record kinds, both scoped by owner identity: one budget row per owner
//! per month holding the subcategory plan as a JSON blob, and one row per
//! transaction. They are linked by `(owner, month)` rather than a foreign
//! key, mirroring the hosted store's layout.

/// Budget rows - one per owner per month
pub mod budget;
/// Transaction rows - one per transaction
pub mod transaction;

pub use budget::Entity as Budget;
pub use transaction::Entity as StoredTransaction;
