//! Card persistence over a key/value backend.
//!
//! # Responsibility
//! - Define the key/value storage contract the board persists through.
//! - Keep the serialized collection format inside one module.
//!
//! # Invariants
//! - The whole card collection lives under one key as a JSON array.
//! - Loading never fails; unreadable data degrades to an empty board.
//! - Write failures are returned to the caller, never swallowed.

pub mod card_store;
pub mod kv;
