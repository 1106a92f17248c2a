//! Core use-case services.
//!
//! # Responsibility
//! - Validate raw form input before it reaches the record stores.
//! - Open the three business stores over one connection.
//! - Answer read-only cross-store questions (order history, dangling names).
//!
//! # Invariants
//! - Services never enforce referential integrity between stores.

pub mod business;
pub mod forms;
pub mod relations;
