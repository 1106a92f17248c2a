//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose list/add/edit/delete for services, customers, and orders to Dart
//!   via FRB.
//! - Run raw form input through core validation before touching a store.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call loads stores, runs one operation, and persists before
//!   returning; calls are serialized process-wide so full-collection writes
//!   never interleave.

use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tilemaster_core::db::open_db;
use tilemaster_core::{
    core_version as core_version_inner, customer_names as customer_names_inner,
    init_logging as init_logging_inner, ping as ping_inner, BusinessStores, Customer,
    CustomerForm, Order, OrderForm, RecordId, ServiceForm, ServiceOffering, UpdateOutcome,
};
use uuid::Uuid;

const DB_FILE_NAME: &str = "tilemaster.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORES_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Service offering row for list screens.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceItem {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub material: String,
    pub cost: f64,
    pub labor_cost: f64,
    /// Derived `cost + labor_cost`.
    pub total_cost: f64,
    pub time_required: String,
    pub description: String,
}

/// Customer row for list screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerItem {
    pub id: String,
    pub name: String,
    pub contact_info: String,
    pub address: String,
}

/// Order row for list screens.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: String,
    pub service_name: String,
    pub quantity: u32,
    pub total_cost: f64,
    pub customer_name: String,
    pub order_date_epoch_ms: i64,
    /// `Pending|Completed`.
    pub status: String,
    /// `Unpaid|Paid`.
    pub payment_status: String,
}

/// Raw service form fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceInput {
    pub name: String,
    pub kind: String,
    pub cost: String,
    pub labor_cost: String,
    pub time_required: String,
    pub description: String,
    pub material: String,
}

/// Raw customer form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInput {
    pub name: String,
    pub contact_info: String,
    pub address: String,
}

/// Raw order form fields. Empty statuses default to `Pending`/`Unpaid`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderInput {
    pub service_name: String,
    pub quantity: String,
    pub customer_name: String,
    pub status: String,
    pub payment_status: String,
}

/// Generic action response envelope for mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreActionResponse {
    /// Whether the store changed.
    pub ok: bool,
    /// Affected record ID when one was found or created.
    pub record_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl StoreActionResponse {
    fn success(message: impl Into<String>, record_id: RecordId) -> Self {
        Self {
            ok: true,
            record_id: Some(record_id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record_id: None,
            message: message.into(),
        }
    }
}

/// List envelope for the services screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceListResponse {
    pub items: Vec<ServiceItem>,
    /// Empty on success, error text otherwise.
    pub message: String,
}

/// List envelope for the customers screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerListResponse {
    pub items: Vec<CustomerItem>,
    pub message: String,
}

/// List envelope for the orders screen and customer order history.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderListResponse {
    pub items: Vec<OrderItem>,
    pub message: String,
}

/// Lists service offerings in insertion order.
#[flutter_rust_bridge::frb(sync)]
pub fn service_list() -> ServiceListResponse {
    let result = with_stores(|stores| {
        Ok(stores
            .services
            .list()
            .iter()
            .map(to_service_item)
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => ServiceListResponse {
            items,
            message: String::new(),
        },
        Err(message) => ServiceListResponse {
            items: Vec::new(),
            message: format!("service_list failed: {message}"),
        },
    }
}

/// Validates and appends a service offering.
#[flutter_rust_bridge::frb(sync)]
pub fn service_add(input: ServiceInput) -> StoreActionResponse {
    let result = with_stores(|stores| {
        let offering = service_form(input)
            .to_new_offering()
            .map_err(|err| err.to_string())?;
        stores.services.add(offering).map_err(|err| err.to_string())
    });
    match result {
        Ok(id) => StoreActionResponse::success("Service added.", id),
        Err(err) => StoreActionResponse::failure(format!("service_add failed: {err}")),
    }
}

/// Validates and replaces the service offering with `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn service_update(id: String, input: ServiceInput) -> StoreActionResponse {
    let result = with_stores(|stores| {
        let id = parse_record_id(&id)?;
        let Some(existing) = stores.services.get(id) else {
            return Ok(None);
        };
        let offering = service_form(input)
            .to_edited_offering(existing)
            .map_err(|err| err.to_string())?;
        let outcome = stores
            .services
            .update(offering)
            .map_err(|err| err.to_string())?;
        Ok(replaced_id(outcome, id))
    });
    update_response("service_update", "Service updated.", "Service not found.", result)
}

/// Removes the service offering with `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn service_delete(id: String) -> StoreActionResponse {
    let result = with_stores(|stores| {
        let id = parse_record_id(&id)?;
        let removed = stores.services.delete(id).map_err(|err| err.to_string())?;
        Ok(removed.map(|offering| offering.id))
    });
    update_response("service_delete", "Service deleted.", "Service not found.", result)
}

/// Lists customers in insertion order.
#[flutter_rust_bridge::frb(sync)]
pub fn customer_list() -> CustomerListResponse {
    let result = with_stores(|stores| {
        Ok(stores
            .customers
            .list()
            .iter()
            .map(to_customer_item)
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => CustomerListResponse {
            items,
            message: String::new(),
        },
        Err(message) => CustomerListResponse {
            items: Vec::new(),
            message: format!("customer_list failed: {message}"),
        },
    }
}

/// Distinct customer names for the order form picker.
///
/// Returns an empty list when storage cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn customer_names() -> Vec<String> {
    with_stores(|stores| {
        Ok(customer_names_inner(stores.customers.list())
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>())
    })
    .unwrap_or_else(|err| {
        warn!("event=ffi_call module=ffi status=error call=customer_names error={err}");
        Vec::new()
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn customer_add(input: CustomerInput) -> StoreActionResponse {
    let result = with_stores(|stores| {
        let customer = customer_form(input)
            .to_new_customer()
            .map_err(|err| err.to_string())?;
        stores.customers.add(customer).map_err(|err| err.to_string())
    });
    match result {
        Ok(id) => StoreActionResponse::success("Customer added.", id),
        Err(err) => StoreActionResponse::failure(format!("customer_add failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn customer_update(id: String, input: CustomerInput) -> StoreActionResponse {
    let result = with_stores(|stores| {
        let id = parse_record_id(&id)?;
        let Some(existing) = stores.customers.get(id) else {
            return Ok(None);
        };
        let customer = customer_form(input)
            .to_edited_customer(existing)
            .map_err(|err| err.to_string())?;
        let outcome = stores
            .customers
            .update(customer)
            .map_err(|err| err.to_string())?;
        Ok(replaced_id(outcome, id))
    });
    update_response(
        "customer_update",
        "Customer updated.",
        "Customer not found.",
        result,
    )
}

/// Removes the customer with `id`. Orders naming the customer are kept.
#[flutter_rust_bridge::frb(sync)]
pub fn customer_delete(id: String) -> StoreActionResponse {
    let result = with_stores(|stores| {
        let id = parse_record_id(&id)?;
        let removed = stores.customers.delete(id).map_err(|err| err.to_string())?;
        Ok(removed.map(|customer| customer.id))
    });
    update_response(
        "customer_delete",
        "Customer deleted.",
        "Customer not found.",
        result,
    )
}

/// Orders whose customer name matches the customer with `customer_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn customer_order_history(customer_id: String) -> OrderListResponse {
    let result = with_stores(|stores| {
        let id = parse_record_id(&customer_id)?;
        let customer = stores
            .customers
            .get(id)
            .ok_or_else(|| format!("customer not found: {id}"))?;
        Ok(customer
            .order_history(stores.orders.list())
            .into_iter()
            .map(to_order_item)
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => OrderListResponse {
            items,
            message: String::new(),
        },
        Err(message) => OrderListResponse {
            items: Vec::new(),
            message: format!("customer_order_history failed: {message}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn order_list() -> OrderListResponse {
    let result = with_stores(|stores| {
        Ok(stores
            .orders
            .list()
            .iter()
            .map(to_order_item)
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => OrderListResponse {
            items,
            message: String::new(),
        },
        Err(message) => OrderListResponse {
            items: Vec::new(),
            message: format!("order_list failed: {message}"),
        },
    }
}

/// Validates and appends an order priced at the flat unit rate.
#[flutter_rust_bridge::frb(sync)]
pub fn order_add(input: OrderInput) -> StoreActionResponse {
    let result = with_stores(|stores| {
        let order = order_form(input)
            .to_new_order()
            .map_err(|err| err.to_string())?;
        stores.orders.add(order).map_err(|err| err.to_string())
    });
    match result {
        Ok(id) => StoreActionResponse::success("Order added.", id),
        Err(err) => StoreActionResponse::failure(format!("order_add failed: {err}")),
    }
}

/// Validates and replaces the order with `id`; the order date is kept.
#[flutter_rust_bridge::frb(sync)]
pub fn order_update(id: String, input: OrderInput) -> StoreActionResponse {
    let result = with_stores(|stores| {
        let id = parse_record_id(&id)?;
        let Some(existing) = stores.orders.get(id) else {
            return Ok(None);
        };
        let order = order_form(input)
            .to_edited_order(existing)
            .map_err(|err| err.to_string())?;
        let outcome = stores.orders.update(order).map_err(|err| err.to_string())?;
        Ok(replaced_id(outcome, id))
    });
    update_response("order_update", "Order updated.", "Order not found.", result)
}

#[flutter_rust_bridge::frb(sync)]
pub fn order_delete(id: String) -> StoreActionResponse {
    let result = with_stores(|stores| {
        let id = parse_record_id(&id)?;
        let removed = stores.orders.delete(id).map_err(|err| err.to_string())?;
        Ok(removed.map(|order| order.id))
    });
    update_response("order_delete", "Order deleted.", "Order not found.", result)
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("TILEMASTER_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_stores<T>(
    f: impl FnOnce(&mut BusinessStores<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let _guard = STORES_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let conn = open_db(resolve_db_path()).map_err(|err| format!("DB open failed: {err}"))?;
    let mut stores =
        BusinessStores::open(&conn).map_err(|err| format!("store load failed: {err}"))?;
    f(&mut stores)
}

fn update_response(
    call: &str,
    found_message: &str,
    missing_message: &str,
    result: Result<Option<RecordId>, String>,
) -> StoreActionResponse {
    match result {
        Ok(Some(id)) => StoreActionResponse::success(found_message, id),
        Ok(None) => StoreActionResponse::failure(missing_message),
        Err(err) => StoreActionResponse::failure(format!("{call} failed: {err}")),
    }
}

fn replaced_id(outcome: UpdateOutcome, id: RecordId) -> Option<RecordId> {
    outcome.is_replaced().then_some(id)
}

fn parse_record_id(raw: &str) -> Result<RecordId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid record id `{}`", raw.trim()))
}

fn service_form(input: ServiceInput) -> ServiceForm {
    ServiceForm {
        name: input.name,
        kind: input.kind,
        cost: input.cost,
        labor_cost: input.labor_cost,
        time_required: input.time_required,
        description: input.description,
        material: input.material,
    }
}

fn customer_form(input: CustomerInput) -> CustomerForm {
    CustomerForm {
        name: input.name,
        contact_info: input.contact_info,
        address: input.address,
    }
}

fn order_form(input: OrderInput) -> OrderForm {
    OrderForm {
        service_name: input.service_name,
        quantity: input.quantity,
        customer_name: input.customer_name,
        status: input.status,
        payment_status: input.payment_status,
    }
}

fn to_service_item(offering: &ServiceOffering) -> ServiceItem {
    ServiceItem {
        id: offering.id.to_string(),
        name: offering.name.clone(),
        kind: offering.kind.clone(),
        material: offering.material.clone(),
        cost: offering.cost,
        labor_cost: offering.labor_cost,
        total_cost: offering.total_cost(),
        time_required: offering.time_required.clone(),
        description: offering.description.clone(),
    }
}

fn to_customer_item(customer: &Customer) -> CustomerItem {
    CustomerItem {
        id: customer.id.to_string(),
        name: customer.name.clone(),
        contact_info: customer.contact_info.clone(),
        address: customer.address.clone(),
    }
}

fn to_order_item(order: &Order) -> OrderItem {
    OrderItem {
        id: order.id.to_string(),
        service_name: order.service_name.clone(),
        quantity: order.quantity,
        total_cost: order.total_cost,
        customer_name: order.customer_name.clone(),
        order_date_epoch_ms: order.order_date,
        status: order.status.label().to_string(),
        payment_status: order.payment_status.label().to_string(),
    }
}
