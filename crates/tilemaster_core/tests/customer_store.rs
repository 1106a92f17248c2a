use tilemaster_core::db::open_db_in_memory;
use tilemaster_core::{
    dangling_orders, BusinessStores, Customer, CustomerStore, Order, SqliteSlotStorage,
    UpdateOutcome,
};

#[test]
fn customer_crud_keeps_order_and_ids() {
    let conn = open_db_in_memory().unwrap();
    let mut store = CustomerStore::open(SqliteSlotStorage::try_new(&conn).unwrap()).unwrap();

    let jane = store
        .add(Customer::new("Jane Doe", "555-0100", "1 Main St"))
        .unwrap();
    let ali = store
        .add(Customer::new("Ali Khan", "555-0101", "2 Oak Ave"))
        .unwrap();

    let mut moved = store.get(ali).unwrap().clone();
    moved.address = "9 Elm Ct".to_string();
    assert_eq!(store.update(moved).unwrap(), UpdateOutcome::Replaced);

    let listed: Vec<_> = store.list().iter().map(|c| (c.id, c.address.as_str())).collect();
    assert_eq!(listed, vec![(jane, "1 Main St"), (ali, "9 Elm Ct")]);
}

#[test]
fn deleting_customer_leaves_their_orders_untouched() {
    let conn = open_db_in_memory().unwrap();
    let mut stores = BusinessStores::open(&conn).unwrap();

    let jane = stores
        .customers
        .add(Customer::new("Jane Doe", "555-0100", "1 Main St"))
        .unwrap();
    let order_id = stores
        .orders
        .add(Order::new("Ceramic Install", 3, "Jane Doe"))
        .unwrap();
    let before = stores.orders.get(order_id).unwrap().clone();

    stores.customers.delete(jane).unwrap().unwrap();

    let after = stores.orders.get(order_id).unwrap();
    assert_eq!(after, &before);
    assert_eq!(after.customer_name, "Jane Doe");

    let dangling = dangling_orders(
        stores.orders.list(),
        stores.customers.list(),
        stores.services.list(),
    );
    assert_eq!(dangling.len(), 1);
    assert!(dangling[0].missing_customer);
}

#[test]
fn order_history_matches_by_exact_name() {
    let jane = Customer::new("Jane Doe", "555-0100", "1 Main St");
    let orders = vec![
        Order::new("Ceramic Install", 3, "Jane Doe"),
        Order::new("Backsplash", 1, "Ali Khan"),
        Order::new("Mosaic", 2, "jane doe"),
        Order::new("Grout Repair", 1, "Jane Doe"),
    ];

    let history = jane.order_history(&orders);
    let services: Vec<&str> = history.iter().map(|o| o.service_name.as_str()).collect();
    assert_eq!(services, vec!["Ceramic Install", "Grout Repair"]);
}

#[test]
fn stores_do_not_share_slots() {
    let conn = open_db_in_memory().unwrap();
    {
        let mut stores = BusinessStores::open(&conn).unwrap();
        stores
            .customers
            .add(Customer::new("Jane Doe", "555-0100", "1 Main St"))
            .unwrap();
    }

    let stores = BusinessStores::open(&conn).unwrap();
    assert_eq!(stores.customers.len(), 1);
    assert!(stores.orders.is_empty());
    assert!(stores.services.is_empty());
}
