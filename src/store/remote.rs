//! Remote relational store adapter.
//!
//! Translates in-memory budget state to the two persisted record kinds:
//! budget rows (one per owner per month, subcategory plan as a JSON blob)
//! and transaction rows. All calls are asynchronous and fallible; the
//! service layer owns the optimistic-update-and-revert policy around them.

use crate::entities::{Budget, StoredTransaction, budget, transaction};
use crate::errors::{Error, Result};
use crate::model::{
    AllBudgetData, CategoryMap, MonthKey, MonthRecord, Subcategory, Transaction,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Schema,
    Set,
};
use tracing::debug;

/// Adapter over the remote relational store.
#[derive(Clone, Debug)]
pub struct RemoteStore {
    db: DatabaseConnection,
}

impl RemoteStore {
    /// Wraps an existing database connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects to the store at `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let db = Database::connect(database_url).await?;
        Ok(Self::new(db))
    }

    /// Creates the two store tables from the entity definitions.
    pub async fn create_tables(&self) -> Result<()> {
        use sea_orm::ConnectionTrait;

        let builder = self.db.get_database_backend();
        let schema = Schema::new(builder);

        let budget_table = schema.create_table_from_entity(Budget);
        let transaction_table = schema.create_table_from_entity(StoredTransaction);

        self.db.execute(builder.build(&budget_table)).await?;
        self.db.execute(builder.build(&transaction_table)).await?;

        Ok(())
    }

    /// Loads every month record for `owner`.
    ///
    /// Transaction rows are grouped under their stored month key; rows whose
    /// month has no budget row are dropped. Each month's transaction list is
    /// sorted date-descending for display.
    pub async fn load_all(&self, owner: &str) -> Result<AllBudgetData> {
        let budgets = Budget::find()
            .filter(budget::Column::Owner.eq(owner))
            .all(&self.db)
            .await?;

        let mut data = AllBudgetData::new();
        for row in budgets {
            let month: MonthKey = row.month.parse()?;
            let subcategories: CategoryMap<Vec<Subcategory>> =
                serde_json::from_str(&row.subcategories)?;
            data.insert(
                month,
                MonthRecord {
                    subcategories,
                    transactions: Vec::new(),
                },
            );
        }

        let transactions = StoredTransaction::find()
            .filter(transaction::Column::Owner.eq(owner))
            .all(&self.db)
            .await?;

        let mut dropped = 0usize;
        for row in transactions {
            let month: MonthKey = row.month.parse()?;
            match data.get_mut(&month) {
                Some(record) => record.transactions.push(to_model(row)?),
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            debug!(dropped, owner, "dropped transaction rows with no budget row");
        }

        for record in data.values_mut() {
            crate::core::mutate::sort_transactions(record);
        }

        Ok(data)
    }

    /// Inserts the budget row for a newly created month.
    pub async fn create_month(
        &self,
        owner: &str,
        month: MonthKey,
        subcategories: &CategoryMap<Vec<Subcategory>>,
    ) -> Result<()> {
        let row = budget::ActiveModel {
            owner: Set(owner.to_string()),
            month: Set(month.to_string()),
            subcategories: Set(serde_json::to_string(subcategories)?),
            ..Default::default()
        };
        row.insert(&self.db).await?;
        Ok(())
    }

    /// Replaces the stored subcategory plan for an existing month.
    pub async fn update_subcategories(
        &self,
        owner: &str,
        month: MonthKey,
        subcategories: &CategoryMap<Vec<Subcategory>>,
    ) -> Result<()> {
        let row = Budget::find()
            .filter(budget::Column::Owner.eq(owner))
            .filter(budget::Column::Month.eq(month.to_string()))
            .one(&self.db)
            .await?
            .ok_or(Error::MonthNotFound { month })?;

        let mut active: budget::ActiveModel = row.into();
        active.subcategories = Set(serde_json::to_string(subcategories)?);
        active.update(&self.db).await?;
        Ok(())
    }

    /// Inserts one transaction row under its owning month.
    pub async fn insert_transaction(
        &self,
        owner: &str,
        month: MonthKey,
        tx: &Transaction,
    ) -> Result<()> {
        let row = transaction::ActiveModel {
            id: Set(tx.id.clone()),
            owner: Set(owner.to_string()),
            month: Set(month.to_string()),
            date: Set(tx.date),
            category: Set(tx.category.to_string()),
            subcategory: Set(tx.subcategory.clone()),
            amount: Set(tx.amount),
            note: Set(tx.note.clone()),
        };
        row.insert(&self.db).await?;
        Ok(())
    }

    /// Updates a transaction row in place by id.
    ///
    /// The stored month key is left untouched - ownership is fixed at
    /// creation even when the date moves.
    pub async fn update_transaction(&self, owner: &str, tx: &Transaction) -> Result<()> {
        let row = StoredTransaction::find_by_id(tx.id.clone())
            .filter(transaction::Column::Owner.eq(owner))
            .one(&self.db)
            .await?
            .ok_or_else(|| Error::TransactionNotFound { id: tx.id.clone() })?;

        let mut active: transaction::ActiveModel = row.into();
        active.date = Set(tx.date);
        active.category = Set(tx.category.to_string());
        active.subcategory = Set(tx.subcategory.clone());
        active.amount = Set(tx.amount);
        active.note = Set(tx.note.clone());
        active.update(&self.db).await?;
        Ok(())
    }

    /// Deletes a transaction row by id.
    pub async fn delete_transaction(&self, owner: &str, id: &str) -> Result<()> {
        StoredTransaction::delete_many()
            .filter(transaction::Column::Owner.eq(owner))
            .filter(transaction::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Deletes a month's budget row and all its transaction rows.
    pub async fn delete_month(&self, owner: &str, month: MonthKey) -> Result<()> {
        Budget::delete_many()
            .filter(budget::Column::Owner.eq(owner))
            .filter(budget::Column::Month.eq(month.to_string()))
            .exec(&self.db)
            .await?;
        StoredTransaction::delete_many()
            .filter(transaction::Column::Owner.eq(owner))
            .filter(transaction::Column::Month.eq(month.to_string()))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

fn to_model(row: transaction::Model) -> Result<Transaction> {
    Ok(Transaction {
        id: row.id,
        date: row.date,
        category: row.category.parse()?,
        subcategory: row.subcategory,
        amount: row.amount,
        note: row.note,
    })
}
