//! Core business logic - framework-agnostic and persistence-agnostic.
//!
//! Everything in this module is a pure function over the in-memory model:
//! the derivation engine recomputes aggregates, the lifecycle manager moves
//! months between absent and present, and the mutation operations edit one
//! month record. Persistence and the optimistic-revert policy live in
//! [`crate::service`].

/// Pure derivation of expected/actual aggregates and residuals
pub mod derive;
/// Month lifecycle - creation strategies, selection, deletion
pub mod lifecycle;
/// Budget mutation operations - subcategory and transaction CRUD
pub mod mutate;
/// Wire contract for the external transaction-parsing collaborator
pub mod parse;
