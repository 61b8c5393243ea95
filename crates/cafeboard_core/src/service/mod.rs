//! Board use-case services.
//!
//! # Responsibility
//! - Orchestrate store, board components and the geocoder into use cases.
//! - Keep host bindings decoupled from storage and lookup details.

pub mod board_service;
pub mod creation_flow;
