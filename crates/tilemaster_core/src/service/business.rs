//! Entry point that opens all three business stores at once.

use crate::repo::record_store::{CustomerStore, OrderStore, ServiceCatalogStore, StoreResult};
use crate::repo::slot_storage::SqliteSlotStorage;
use log::info;
use rusqlite::Connection;

/// The service catalog, customer, and order stores of one installation.
///
/// The stores share a connection but no state; a mutation on one never
/// touches the others.
pub struct BusinessStores<'conn> {
    pub services: ServiceCatalogStore<SqliteSlotStorage<'conn>>,
    pub customers: CustomerStore<SqliteSlotStorage<'conn>>,
    pub orders: OrderStore<SqliteSlotStorage<'conn>>,
}

impl<'conn> BusinessStores<'conn> {
    /// Loads every store from `conn`, which must already be migrated.
    pub fn open(conn: &'conn Connection) -> StoreResult<Self> {
        let storage = SqliteSlotStorage::try_new(conn)?;
        let stores = Self {
            services: ServiceCatalogStore::open(storage)?,
            customers: CustomerStore::open(storage)?,
            orders: OrderStore::open(storage)?,
        };
        info!(
            "event=stores_open module=service status=ok services={} customers={} orders={}",
            stores.services.len(),
            stores.customers.len(),
            stores.orders.len()
        );
        Ok(stores)
    }
}
