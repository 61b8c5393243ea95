//! Card domain model.
//!
//! # Responsibility
//! - Define the canonical persisted card shape and its draft form.
//! - Own validation rules shared by the store, the creation flow and the CLI.
//!
//! # Invariants
//! - Screen position is never part of the persisted model.
//! - There is no delete or edit path for cards.

pub mod card;
