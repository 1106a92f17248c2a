use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::HashMap;
use tilemaster_core::db::migrations::latest_version;
use tilemaster_core::db::open_db_in_memory;
use tilemaster_core::{
    Customer, CustomerStore, SlotStorage, SqliteSlotStorage, StoreError, StoreResult,
};

#[test]
fn unwritten_slot_reads_as_none() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteSlotStorage::try_new(&conn).unwrap();

    assert_eq!(storage.read_slot("services").unwrap(), None);
}

#[test]
fn write_slot_overwrites_previous_payload() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteSlotStorage::try_new(&conn).unwrap();

    storage.write_slot("orders", b"[1]").unwrap();
    storage.write_slot("orders", b"[1,2]").unwrap();

    assert_eq!(storage.read_slot("orders").unwrap(), Some(b"[1,2]".to_vec()));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn slots_are_independent() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteSlotStorage::try_new(&conn).unwrap();

    storage.write_slot("customers", b"[]").unwrap();

    assert_eq!(storage.read_slot("customers").unwrap(), Some(b"[]".to_vec()));
    assert_eq!(storage.read_slot("orders").unwrap(), None);
}

#[test]
fn storage_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteSlotStorage::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn storage_rejects_connection_without_slots_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteSlotStorage::try_new(&conn),
        Err(StoreError::MissingRequiredTable("kv_slots"))
    ));
}

#[test]
fn storage_rejects_slots_table_missing_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE kv_slots (
            slot TEXT PRIMARY KEY NOT NULL,
            payload BLOB NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteSlotStorage::try_new(&conn),
        Err(StoreError::MissingRequiredColumn {
            table: "kv_slots",
            column: "updated_at"
        })
    ));
}

#[derive(Default)]
struct MemorySlots {
    slots: RefCell<HashMap<String, Vec<u8>>>,
}

impl SlotStorage for MemorySlots {
    fn read_slot(&self, slot: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.slots.borrow().get(slot).cloned())
    }

    fn write_slot(&self, slot: &str, payload: &[u8]) -> StoreResult<()> {
        self.slots
            .borrow_mut()
            .insert(slot.to_string(), payload.to_vec());
        Ok(())
    }
}

#[test]
fn record_store_runs_on_any_slot_storage() {
    let slots = MemorySlots::default();

    let mut store = CustomerStore::open(&slots).unwrap();
    let id = store
        .add(Customer::new("Jane Doe", "555-0100", "1 Main St"))
        .unwrap();
    assert!(slots.slots.borrow().contains_key("customers"));

    let reopened = CustomerStore::open(&slots).unwrap();
    assert_eq!(reopened.list().len(), 1);
    assert_eq!(reopened.list()[0].id, id);
}
