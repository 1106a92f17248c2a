//! Core record stores for TileMaster.
//! This crate owns the service catalog, customer, and order data and how it
//! is persisted on the device.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::customer::Customer;
pub use model::order::{flat_rate_total, Order, OrderStatus, PaymentStatus, FLAT_UNIT_RATE};
pub use model::service_offering::ServiceOffering;
pub use model::RecordId;
pub use repo::record_store::{
    load_collection, save_collection, CustomerStore, OrderStore, Record, RecordStore,
    ServiceCatalogStore, StoreError, StoreResult, UpdateOutcome,
};
pub use repo::slot_storage::{SlotStorage, SqliteSlotStorage};
pub use service::business::BusinessStores;
pub use service::forms::{CustomerForm, FormError, OrderForm, ServiceForm};
pub use service::relations::{customer_names, dangling_orders, DanglingOrder};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
