//! Customer domain model.
//!
//! # Invariants
//! - Order history is derived by exact name match; no order id list is stored.

use super::order::Order;
use super::RecordId;
use crate::repo::record_store::Record;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    pub contact_info: String,
    pub address: String,
}

impl Customer {
    /// Creates a customer without an id; the store assigns one on add.
    pub fn new(
        name: impl Into<String>,
        contact_info: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            name: name.into(),
            contact_info: contact_info.into(),
            address: address.into(),
        }
    }

    /// Returns orders whose `customer_name` equals this customer's name.
    ///
    /// Matching is exact and case-sensitive. Renaming a customer detaches
    /// previously placed orders.
    pub fn order_history<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders
            .iter()
            .filter(|order| order.customer_name == self.name)
            .collect()
    }
}

impl Record for Customer {
    const SLOT: &'static str = "customers";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}
