//! Read-only helpers over string-keyed links between stores.
//!
//! Orders point at customers and services by name only. Nothing here
//! repairs or rejects a broken link; callers decide what to show.

use crate::model::customer::Customer;
use crate::model::order::Order;
use crate::model::service_offering::ServiceOffering;

/// An order whose customer or service name matches no current record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DanglingOrder<'a> {
    pub order: &'a Order,
    pub missing_customer: bool,
    pub missing_service: bool,
}

/// Distinct customer names in list order, for the order form's picker.
pub fn customer_names(customers: &[Customer]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::with_capacity(customers.len());
    for customer in customers {
        if !names.contains(&customer.name.as_str()) {
            names.push(customer.name.as_str());
        }
    }
    names
}

/// Orders whose `customer_name` or `service_name` matches nothing.
pub fn dangling_orders<'a>(
    orders: &'a [Order],
    customers: &[Customer],
    services: &[ServiceOffering],
) -> Vec<DanglingOrder<'a>> {
    orders
        .iter()
        .filter_map(|order| {
            let missing_customer = !customers
                .iter()
                .any(|customer| customer.name == order.customer_name);
            let missing_service = !services
                .iter()
                .any(|service| service.name == order.service_name);
            (missing_customer || missing_service).then_some(DanglingOrder {
                order,
                missing_customer,
                missing_service,
            })
        })
        .collect()
}
