//! Budget entity - one row per owner per month.
//!
//! The subcategory plan is stored denormalized as a JSON text blob keyed by
//! the canonical category names; the store layer serializes it from and back
//! into the fixed-size category map.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Surrogate primary key
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner identity the row is scoped to
    pub owner: String,
    /// Month key in `YYYY-MM` form; unique per owner by construction
    pub month: String,
    /// Subcategory plan as a JSON object keyed by category name
    #[sea_orm(column_type = "Text")]
    pub subcategories: String,
}

/// Defines relationships between Budget and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
