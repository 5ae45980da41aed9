//! Session-scoped budget service.
//!
//! Owns the in-memory budget state for one session and applies every
//! mutation with the same explicit discipline: validate, snapshot, apply the
//! pure core operation, persist, and on persistence failure restore the
//! snapshot and surface the error. Validation and policy errors are raised
//! before any state change and never reach the store. After any successful
//! mutation the caller re-derives aggregates via
//! [`BudgetSummary::derive`](crate::core::derive::BudgetSummary) - nothing
//! here maintains aggregates incrementally.

use crate::config::AppConfig;
use crate::core::derive::BudgetSummary;
use crate::core::lifecycle::{self, CreateStrategy};
use crate::core::mutate::{self, EntryMode};
use crate::errors::{Error, Result};
use crate::model::{
    AllBudgetData, Category, MonthKey, MonthRecord, NewTransaction, Subcategory, Transaction,
};
use crate::session::SessionContext;
use crate::store::Backend;
use std::borrow::Cow;
use tracing::{info, warn};

/// One session's budget state and its persistence backend.
#[derive(Debug)]
pub struct BudgetService {
    session: SessionContext,
    backend: Backend,
    data: AllBudgetData,
    loaded: bool,
}

impl BudgetService {
    /// Builds a service over an already-constructed backend.
    #[must_use]
    pub const fn new(session: SessionContext, backend: Backend) -> Self {
        Self {
            session,
            backend,
            data: AllBudgetData::new(),
            loaded: false,
        }
    }

    /// Connects the backend matching the session and builds the service.
    pub async fn connect(session: SessionContext, config: &AppConfig) -> Result<Self> {
        let backend = Backend::for_session(&session, config).await?;
        Ok(Self::new(session, backend))
    }

    /// Loads all budget data for the session's owner.
    ///
    /// A brand-new registered user is bootstrapped with one empty record for
    /// the current calendar month; a first-time guest gets the demo seed.
    /// On read failure the in-memory state is left empty but the service is
    /// still marked loaded, so the UI can present an empty/error state
    /// rather than hang.
    pub async fn load(&mut self) -> Result<()> {
        self.loaded = true;
        match self.fetch_all().await {
            Ok(data) => {
                self.data = data;
                info!(
                    owner = self.session.owner().as_str(),
                    months = self.data.len(),
                    "budget data loaded"
                );
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "initial load failed; presenting empty state");
                self.data = AllBudgetData::new();
                Err(e)
            }
        }
    }

    async fn fetch_all(&self) -> Result<AllBudgetData> {
        match &self.backend {
            Backend::Guest(store) => match store.load()? {
                Some(data) => Ok(data),
                None => store.seed(),
            },
            Backend::Remote(store) => {
                let owner = self.session.owner().as_str();
                let mut data = store.load_all(owner).await?;
                if data.is_empty() {
                    // One-time bootstrap for a brand-new account: a blank
                    // record for the current calendar month.
                    let month = MonthKey::current();
                    let record = MonthRecord::default();
                    store.create_month(owner, month, &record.subcategories).await?;
                    data.insert(month, record);
                    info!(%month, "bootstrapped first month for new account");
                }
                Ok(data)
            }
        }
    }

    /// Whether the initial load has completed (successfully or not).
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// All in-memory budget data.
    #[must_use]
    pub const fn data(&self) -> &AllBudgetData {
        &self.data
    }

    /// Read-only view of a month; absent months yield a transient empty
    /// record.
    #[must_use]
    pub fn month_view(&self, month: MonthKey) -> Cow<'_, MonthRecord> {
        lifecycle::month_view(&self.data, month)
    }

    /// Derived aggregates for a month, recomputed from the current record.
    #[must_use]
    pub fn summary(&self, month: MonthKey) -> BudgetSummary {
        BudgetSummary::derive(&self.month_view(month))
    }

    /// Present month keys, most recent first.
    #[must_use]
    pub fn available_months(&self) -> Vec<MonthKey> {
        lifecycle::available_months(&self.data)
    }

    /// Creates a new month with the given strategy.
    pub async fn create_month(
        &mut self,
        month: MonthKey,
        strategy: CreateStrategy,
        source: Option<MonthKey>,
    ) -> Result<()> {
        let snapshot = self.data.clone();
        let subcategories =
            lifecycle::create_month(&mut self.data, month, strategy, source)?
                .subcategories
                .clone();

        let persisted = match &self.backend {
            Backend::Guest(store) => store.save(&self.data),
            Backend::Remote(store) => {
                store
                    .create_month(self.session.owner().as_str(), month, &subcategories)
                    .await
            }
        };
        self.commit_or_rollback(snapshot, persisted)
    }

    /// Deletes a month and all its transactions. Rejected when it is the
    /// owner's only remaining month.
    pub async fn delete_month(&mut self, month: MonthKey) -> Result<()> {
        let snapshot = self.data.clone();
        lifecycle::delete_month(&mut self.data, month)?;

        let persisted = match &self.backend {
            Backend::Guest(store) => store.save(&self.data),
            Backend::Remote(store) => {
                store.delete_month(self.session.owner().as_str(), month).await
            }
        };
        self.commit_or_rollback(snapshot, persisted)
    }

    /// Adds a subcategory to a month's plan.
    pub async fn add_subcategory(
        &mut self,
        month: MonthKey,
        category: Category,
        name: &str,
        expected: f64,
    ) -> Result<Subcategory> {
        let snapshot = self.data.clone();
        let record = self.record_mut(month)?;
        let sub = mutate::add_subcategory(record, category, name, expected)?;
        match self.persist_subcategories(month).await {
            Ok(()) => Ok(sub),
            Err(e) => {
                self.rollback(snapshot, &e);
                Err(e)
            }
        }
    }

    /// Renames a subcategory; its transactions keep the old name.
    pub async fn rename_subcategory(
        &mut self,
        month: MonthKey,
        category: Category,
        id: &str,
        new_name: &str,
    ) -> Result<()> {
        let snapshot = self.data.clone();
        let record = self.record_mut(month)?;
        mutate::rename_subcategory(record, category, id, new_name)?;
        let persisted = self.persist_subcategories(month).await;
        self.commit_or_rollback(snapshot, persisted)
    }

    /// Deletes a subcategory by id; orphaned transactions persist.
    pub async fn delete_subcategory(
        &mut self,
        month: MonthKey,
        category: Category,
        id: &str,
    ) -> Result<()> {
        let snapshot = self.data.clone();
        let record = self.record_mut(month)?;
        mutate::delete_subcategory(record, category, id)?;
        let persisted = self.persist_subcategories(month).await;
        self.commit_or_rollback(snapshot, persisted)
    }

    /// Replaces a subcategory's planned amount (negatives coerced to 0).
    pub async fn update_subcategory_expected(
        &mut self,
        month: MonthKey,
        category: Category,
        id: &str,
        amount: f64,
    ) -> Result<()> {
        let snapshot = self.data.clone();
        let record = self.record_mut(month)?;
        mutate::update_subcategory_expected(record, category, id, amount)?;
        let persisted = self.persist_subcategories(month).await;
        self.commit_or_rollback(snapshot, persisted)
    }

    /// Flips a subcategory's exclude-from-budget flag.
    pub async fn toggle_exclude_from_budget(
        &mut self,
        month: MonthKey,
        category: Category,
        id: &str,
    ) -> Result<()> {
        let snapshot = self.data.clone();
        let record = self.record_mut(month)?;
        mutate::toggle_exclude_from_budget(record, category, id)?;
        let persisted = self.persist_subcategories(month).await;
        self.commit_or_rollback(snapshot, persisted)
    }

    /// Inserts a transaction into a month.
    ///
    /// `Assisted` entry may auto-create the subcategory, in which case the
    /// updated plan is persisted alongside the new transaction row.
    pub async fn add_transaction(
        &mut self,
        month: MonthKey,
        new_tx: NewTransaction,
        mode: EntryMode,
    ) -> Result<Transaction> {
        let snapshot = self.data.clone();
        let record = self.record_mut(month)?;
        let subcategories_before = record.subcategories.clone();
        let tx = mutate::insert_transaction(record, new_tx, mode)?;
        let plan_changed = record.subcategories != subcategories_before;

        let persisted = match &self.backend {
            Backend::Guest(store) => store.save(&self.data),
            Backend::Remote(store) => {
                let owner = self.session.owner().as_str();
                let mut result = store.insert_transaction(owner, month, &tx).await;
                if result.is_ok() && plan_changed {
                    let subcategories = self
                        .data
                        .get(&month)
                        .map(|r| r.subcategories.clone())
                        .unwrap_or_default();
                    result = store.update_subcategories(owner, month, &subcategories).await;
                }
                result
            }
        };
        match persisted {
            Ok(()) => Ok(tx),
            Err(e) => {
                self.rollback(snapshot, &e);
                Err(e)
            }
        }
    }

    /// Replaces a transaction by id within its owning month.
    pub async fn update_transaction(&mut self, month: MonthKey, tx: Transaction) -> Result<()> {
        let snapshot = self.data.clone();
        let record = self.record_mut(month)?;
        mutate::update_transaction(record, tx.clone())?;

        let persisted = match &self.backend {
            Backend::Guest(store) => store.save(&self.data),
            Backend::Remote(store) => {
                store.update_transaction(self.session.owner().as_str(), &tx).await
            }
        };
        self.commit_or_rollback(snapshot, persisted)
    }

    /// Removes a transaction by id from its owning month.
    pub async fn delete_transaction(&mut self, month: MonthKey, id: &str) -> Result<()> {
        let snapshot = self.data.clone();
        let record = self.record_mut(month)?;
        mutate::remove_transaction(record, id)?;

        let persisted = match &self.backend {
            Backend::Guest(store) => store.save(&self.data),
            Backend::Remote(store) => {
                store.delete_transaction(self.session.owner().as_str(), id).await
            }
        };
        self.commit_or_rollback(snapshot, persisted)
    }

    fn record_mut(&mut self, month: MonthKey) -> Result<&mut MonthRecord> {
        self.data
            .get_mut(&month)
            .ok_or(Error::MonthNotFound { month })
    }

    async fn persist_subcategories(&self, month: MonthKey) -> Result<()> {
        match &self.backend {
            Backend::Guest(store) => store.save(&self.data),
            Backend::Remote(store) => {
                let subcategories = self
                    .data
                    .get(&month)
                    .map(|r| r.subcategories.clone())
                    .unwrap_or_default();
                store
                    .update_subcategories(self.session.owner().as_str(), month, &subcategories)
                    .await
            }
        }
    }

    fn commit_or_rollback(&mut self, snapshot: AllBudgetData, persisted: Result<()>) -> Result<()> {
        match persisted {
            Ok(()) => Ok(()),
            Err(e) => {
                self.rollback(snapshot, &e);
                Err(e)
            }
        }
    }

    fn rollback(&mut self, snapshot: AllBudgetData, error: &Error) {
        warn!(error = %error, "persistence failed; reverting in-memory state");
        self.data = snapshot;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::store::{GuestStore, RemoteStore};
    use crate::test_utils::{month, new_transaction, setup_test_store};
    use sea_orm::ConnectionTrait;

    fn remote_service(store: RemoteStore) -> BudgetService {
        BudgetService::new(SessionContext::user("user-1"), Backend::Remote(store))
    }

    async fn loaded_remote_service() -> Result<(BudgetService, RemoteStore)> {
        let store = setup_test_store().await?;
        let mut service = remote_service(store.clone());
        service.load().await?;
        Ok((service, store))
    }

    #[tokio::test]
    async fn test_load_bootstraps_first_month_for_new_account() -> Result<()> {
        let (service, store) = loaded_remote_service().await?;

        assert!(service.is_loaded());
        assert_eq!(service.available_months(), [MonthKey::current()]);
        // The bootstrap row is durable, not just in memory.
        let reloaded = store.load_all("user-1").await?;
        assert_eq!(reloaded.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_bootstrap_happens_once() -> Result<()> {
        let (mut service, _store) = loaded_remote_service().await?;
        service
            .create_month(month("2030-01"), CreateStrategy::Scratch, None)
            .await?;

        service.load().await?;
        assert_eq!(service.available_months().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_guest_load_seeds_demo_data_once() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = GuestStore::new(dir.path().join("guest.json"));
        let mut service =
            BudgetService::new(SessionContext::guest(), Backend::Guest(store));

        service.load().await?;
        assert_eq!(service.available_months().len(), 2);

        // A mutation then a reload sees the mutation, not a fresh seed.
        let current = MonthKey::current();
        service
            .add_subcategory(current, Category::Expenses, "Hobbies", 75.0)
            .await?;
        service.load().await?;
        assert!(
            service
                .month_view(current)
                .subcategory_by_name(Category::Expenses, "Hobbies")
                .is_some()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_mutations_require_existing_month() -> Result<()> {
        let (mut service, _store) = loaded_remote_service().await?;
        let err = service
            .add_subcategory(month("1999-01"), Category::Bills, "Rent", 100.0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MonthNotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_full_flow_derives_expected_figures() -> Result<()> {
        let (mut service, _store) = loaded_remote_service().await?;
        let key = month("2024-03");
        service
            .create_month(key, CreateStrategy::Scratch, None)
            .await?;
        service
            .add_subcategory(key, Category::Income, "Salary", 5000.0)
            .await?;
        service
            .add_subcategory(key, Category::Bills, "Rent", 2000.0)
            .await?;
        service
            .add_transaction(
                key,
                new_transaction(Category::Income, "Salary", 5000.0, "2024-03-15"),
                EntryMode::Manual,
            )
            .await?;
        service
            .add_transaction(
                key,
                new_transaction(Category::Bills, "rent", 2000.0, "2024-03-01"),
                EntryMode::Manual,
            )
            .await?;

        let summary = service.summary(key);
        assert_eq!(summary.expected[Category::Income], 5000.0);
        assert_eq!(summary.actual[Category::Bills], 2000.0);
        assert_eq!(summary.remaining_to_budget, 3000.0);
        assert_eq!(summary.remaining_to_spend, 3000.0);
        // Lowercase entry was canonicalized.
        assert_eq!(
            service.month_view(key).transactions.last().unwrap().subcategory,
            "Rent"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_assisted_transaction_persists_auto_created_subcategory() -> Result<()> {
        let (mut service, store) = loaded_remote_service().await?;
        let key = month("2024-03");
        service
            .create_month(key, CreateStrategy::Scratch, None)
            .await?;

        service
            .add_transaction(
                key,
                new_transaction(Category::Expenses, "Coffee", 4.5, "2024-03-02"),
                EntryMode::Assisted,
            )
            .await?;

        let reloaded = store.load_all("user-1").await?;
        let record = reloaded.get(&key).unwrap();
        let sub = record
            .subcategory_by_name(Category::Expenses, "Coffee")
            .unwrap();
        assert_eq!(sub.expected, 0.0);
        assert_eq!(record.transactions.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_last_month_rejected_before_store_call() -> Result<()> {
        let (mut service, store) = loaded_remote_service().await?;
        let only = service.available_months()[0];

        let err = service.delete_month(only).await.unwrap_err();
        assert!(matches!(err, Error::LastMonth));
        assert_eq!(service.available_months().len(), 1);
        assert_eq!(store.load_all("user-1").await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_persistence_failure_reverts_in_memory_state() -> Result<()> {
        let db = sea_orm::Database::connect("sqlite::memory:").await?;
        let store = RemoteStore::new(db.clone());
        store.create_tables().await?;
        let mut service = remote_service(store);
        service.load().await?;
        let key = service.available_months()[0];
        let before = service.data().clone();

        // Break the store underneath the service.
        db.execute_unprepared("DROP TABLE budgets").await?;

        let err = service
            .add_subcategory(key, Category::Bills, "Rent", 100.0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Database(_)));
        assert_eq!(service.data(), &before);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_failure_leaves_empty_but_loaded() -> Result<()> {
        let db = sea_orm::Database::connect("sqlite::memory:").await?;
        // No tables created: load_all fails.
        let mut service = remote_service(RemoteStore::new(db));

        assert!(service.load().await.is_err());
        assert!(service.is_loaded());
        assert!(service.data().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_copy_and_blank_strategies_through_service() -> Result<()> {
        let (mut service, _store) = loaded_remote_service().await?;
        let source = month("2024-02");
        service
            .create_month(source, CreateStrategy::Scratch, None)
            .await?;
        service
            .add_subcategory(source, Category::Expenses, "Groceries", 500.0)
            .await?;

        service
            .create_month(month("2024-03"), CreateStrategy::Copy, Some(source))
            .await?;
        service
            .create_month(month("2024-04"), CreateStrategy::Blank, Some(source))
            .await?;

        let copied = service.month_view(month("2024-03"));
        assert_eq!(
            copied
                .subcategory_by_name(Category::Expenses, "Groceries")
                .unwrap()
                .expected,
            500.0
        );
        let blanked = service.month_view(month("2024-04"));
        assert_eq!(
            blanked
                .subcategory_by_name(Category::Expenses, "Groceries")
                .unwrap()
                .expected,
            0.0
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_transaction_through_service() -> Result<()> {
        let (mut service, store) = loaded_remote_service().await?;
        let key = month("2024-03");
        service
            .create_month(key, CreateStrategy::Scratch, None)
            .await?;
        service
            .add_subcategory(key, Category::Expenses, "Groceries", 500.0)
            .await?;
        let tx = service
            .add_transaction(
                key,
                new_transaction(Category::Expenses, "Groceries", 50.0, "2024-03-02"),
                EntryMode::Manual,
            )
            .await?;

        let mut edited = tx.clone();
        edited.amount = 60.0;
        service.update_transaction(key, edited).await?;
        assert_eq!(service.summary(key).actual[Category::Expenses], 60.0);

        service.delete_transaction(key, &tx.id).await?;
        assert!(service.month_view(key).transactions.is_empty());
        assert!(
            store
                .load_all("user-1")
                .await?
                .get(&key)
                .unwrap()
                .transactions
                .is_empty()
        );
        Ok(())
    }
}
