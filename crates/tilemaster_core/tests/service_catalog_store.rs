use tilemaster_core::db::{open_db, open_db_in_memory};
use tilemaster_core::{
    ServiceCatalogStore, ServiceOffering, SqliteSlotStorage, StoreError, UpdateOutcome,
};
use uuid::Uuid;

fn offering(name: &str, cost: f64, labor_cost: f64) -> ServiceOffering {
    let mut offering = ServiceOffering::new(name, "Floor", cost, labor_cost);
    offering.time_required = "1 day".to_string();
    offering.material = "Ceramic".to_string();
    offering
}

#[test]
fn added_offering_reads_back_derived_total() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ServiceCatalogStore::open(SqliteSlotStorage::try_new(&conn).unwrap()).unwrap();

    let id = store.add(offering("Ceramic Install", 200.0, 150.0)).unwrap();

    let stored = store.get(id).unwrap();
    assert_eq!(stored.name, "Ceramic Install");
    assert_eq!(stored.total_cost(), 350.0);
}

#[test]
fn add_assigns_fresh_ids_and_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ServiceCatalogStore::open(SqliteSlotStorage::try_new(&conn).unwrap()).unwrap();

    let names = ["Backsplash", "Ceramic Install", "Grout Repair", "Mosaic"];
    let mut ids = Vec::new();
    for name in names {
        ids.push(store.add(offering(name, 10.0, 5.0)).unwrap());
    }

    let listed: Vec<&str> = store.list().iter().map(|item| item.name.as_str()).collect();
    assert_eq!(listed, names);
    assert!(ids.iter().all(|id| !id.is_nil()));
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), names.len());
}

#[test]
fn add_keeps_caller_provided_id_and_rejects_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ServiceCatalogStore::open(SqliteSlotStorage::try_new(&conn).unwrap()).unwrap();

    let mut first = offering("Ceramic Install", 200.0, 150.0);
    first.id = Uuid::parse_str("00000000-0000-4000-8000-000000000001").unwrap();
    let id = store.add(first.clone()).unwrap();
    assert_eq!(id, first.id);

    let err = store.add(first).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId(dup) if dup == id));
    assert_eq!(store.len(), 1);
}

#[test]
fn update_replaces_in_place_and_total_follows() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ServiceCatalogStore::open(SqliteSlotStorage::try_new(&conn).unwrap()).unwrap();

    store.add(offering("Backsplash", 80.0, 40.0)).unwrap();
    let id = store.add(offering("Ceramic Install", 200.0, 150.0)).unwrap();
    store.add(offering("Mosaic", 300.0, 300.0)).unwrap();

    let mut edited = store.get(id).unwrap().clone();
    edited.labor_cost = 175.25;
    assert_eq!(store.update(edited).unwrap(), UpdateOutcome::Replaced);

    assert_eq!(store.position(id), Some(1));
    assert_eq!(store.get(id).unwrap().total_cost(), 375.25);
}

#[test]
fn repeated_update_with_same_value_is_stable() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ServiceCatalogStore::open(SqliteSlotStorage::try_new(&conn).unwrap()).unwrap();

    let id = store.add(offering("Ceramic Install", 200.0, 150.0)).unwrap();
    let mut edited = store.get(id).unwrap().clone();
    edited.description = "Includes leveling".to_string();

    store.update(edited.clone()).unwrap();
    let after_first = store.list().to_vec();
    store.update(edited).unwrap();

    assert_eq!(store.list(), after_first.as_slice());
}

#[test]
fn update_of_unknown_id_reports_not_found_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ServiceCatalogStore::open(SqliteSlotStorage::try_new(&conn).unwrap()).unwrap();

    let mut stranger = offering("Ghost", 1.0, 1.0);
    stranger.id = Uuid::new_v4();

    let outcome = store.update(stranger).unwrap();
    assert_eq!(outcome, UpdateOutcome::NotFound);
    assert!(!outcome.is_replaced());
    assert!(store.is_empty());

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn delete_by_id_removes_exactly_one_and_preserves_order() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ServiceCatalogStore::open(SqliteSlotStorage::try_new(&conn).unwrap()).unwrap();

    let a = store.add(offering("A", 1.0, 1.0)).unwrap();
    let b = store.add(offering("B", 2.0, 2.0)).unwrap();
    let c = store.add(offering("C", 3.0, 3.0)).unwrap();

    let removed = store.delete(b).unwrap().unwrap();
    assert_eq!(removed.name, "B");

    let remaining: Vec<_> = store.list().iter().map(|item| item.id).collect();
    assert_eq!(remaining, vec![a, c]);

    assert!(store.delete(b).unwrap().is_none());
    assert_eq!(store.len(), 2);
}

#[test]
fn delete_at_position_and_out_of_range() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ServiceCatalogStore::open(SqliteSlotStorage::try_new(&conn).unwrap()).unwrap();

    store.add(offering("A", 1.0, 1.0)).unwrap();
    store.add(offering("B", 2.0, 2.0)).unwrap();

    assert_eq!(store.delete_at(0).unwrap().unwrap().name, "A");
    assert!(store.delete_at(5).unwrap().is_none());
    assert_eq!(store.list()[0].name, "B");
}

#[test]
fn out_of_range_delete_at_does_not_touch_storage() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ServiceCatalogStore::open(SqliteSlotStorage::try_new(&conn).unwrap()).unwrap();
    store.add(offering("A", 1.0, 1.0)).unwrap();

    // Any write would now fail, so `Ok(None)` shows nothing was saved.
    conn.execute_batch("DROP TABLE kv_slots;").unwrap();

    assert!(store.delete_at(1).unwrap().is_none());
    assert!(store.delete(Uuid::new_v4()).unwrap().is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn collection_survives_reopen_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tilemaster.db");

    let expected = {
        let conn = open_db(&path).unwrap();
        let mut store =
            ServiceCatalogStore::open(SqliteSlotStorage::try_new(&conn).unwrap()).unwrap();
        let id = store.add(offering("Ceramic Install", 200.0, 150.0)).unwrap();
        store.add(offering("Grout Repair", 40.0, 60.0)).unwrap();
        let mut edited = store.get(id).unwrap().clone();
        edited.cost = 220.0;
        store.update(edited).unwrap();
        store.list().to_vec()
    };

    let conn = open_db(&path).unwrap();
    let store = ServiceCatalogStore::open(SqliteSlotStorage::try_new(&conn).unwrap()).unwrap();
    assert_eq!(store.list(), expected.as_slice());
    assert_eq!(store.list()[0].total_cost(), 370.0);
}
