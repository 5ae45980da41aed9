//! `ZenithBudget` - A zero-based monthly budgeting engine
//!
//! This crate provides the state derivation core of a personal budgeting
//! application: per-month budget records (subcategory plans plus transaction
//! logs), pure derivation of expected/actual aggregates, month lifecycle
//! management with copy/blank/scratch creation, and a session-scoped service
//! that persists every mutation optimistically against either a remote
//! relational store or a guest-local blob store.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Style consistency
    clippy::enum_glob_use,
    clippy::inconsistent_struct_constructor,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

/// Application configuration loaded from the environment
pub mod config;
/// Core business logic - derivation, lifecycle, mutations, and the parser contract
pub mod core;
/// `SeaORM` entity definitions for the remote store tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// In-memory entity model - categories, month keys, and budget records
pub mod model;
/// Session-scoped orchestration of budget state and persistence
pub mod service;
/// Session context - owner identity for the lifetime of one session
pub mod session;
/// Persistence adapters - remote relational store and guest-local blob store
pub mod store;

#[cfg(test)]
pub mod test_utils;
