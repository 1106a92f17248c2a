//! Repository layer: slot persistence and in-memory record stores.
//!
//! # Responsibility
//! - Define the slot persistence contract and its SQLite implementation.
//! - Provide the generic CRUD record store shared by services, customers,
//!   and orders.
//!
//! # Invariants
//! - Every successful mutation re-serializes the full collection to its slot.
//! - A failed save leaves the in-memory collection as it was before the call.

pub mod record_store;
pub mod slot_storage;
