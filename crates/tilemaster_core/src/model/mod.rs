//! Domain model for the tile-service business records.
//!
//! # Responsibility
//! - Define the three record shapes persisted by the core: service offerings,
//!   customers, and orders.
//! - Keep derived values (service totals) computed, and stored values (order
//!   totals) recomputed at write time.
//!
//! # Invariants
//! - Every record is identified by a `RecordId`; nil means "not yet assigned".
//! - Records never reference each other by id. Orders name their customer and
//!   service as free text.

use uuid::Uuid;

pub mod customer;
pub mod order;
pub mod service_offering;

/// Stable identifier for every persisted record.
pub type RecordId = Uuid;
