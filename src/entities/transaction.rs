//! Transaction entity - one row per transaction.
//!
//! Rows carry the owning month key explicitly: a transaction belongs to the
//! month it was created under, even if its date is later edited into a
//! different calendar month.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Opaque unique identifier (uuid v4 string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owner identity the row is scoped to
    pub owner: String,
    /// Month key of the owning month record
    pub month: String,
    /// Calendar date of the transaction
    pub date: Date,
    /// One of the six canonical category names
    pub category: String,
    /// Subcategory name as recorded at entry time
    pub subcategory: String,
    /// Transaction amount, non-negative
    pub amount: f64,
    /// Free-form note
    pub note: String,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
