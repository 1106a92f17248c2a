//! Order domain model.
//!
//! # Responsibility
//! - Define order status enums and the flat-rate pricing rule.
//!
//! # Invariants
//! - `total_cost` is stored, and rewritten as `quantity * FLAT_UNIT_RATE`
//!   whenever the order store writes the record.
//! - `order_date` is fixed at creation; store updates keep the stored value.
//! - Status fields are plain setters. No transition is enforced.

use super::RecordId;
use crate::repo::record_store::Record;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Fixed price per unit of quantity, independent of the named service.
pub const FLAT_UNIT_RATE: f64 = 100.0;

/// Work progress of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
}

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

impl OrderStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
        }
    }

    /// Parses a UI label, ignoring case and surrounding whitespace.
    pub fn parse_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl PaymentStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unpaid" => Some(Self::Unpaid),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

/// Customer order for some quantity of a named service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: RecordId,
    /// Free text; not checked against the service catalog.
    pub service_name: String,
    pub quantity: u32,
    pub total_cost: f64,
    /// Free text; not checked against the customer store.
    pub customer_name: String,
    /// Unix epoch milliseconds.
    pub order_date: i64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
}

impl Order {
    /// Creates a pending, unpaid order dated now, without an id.
    pub fn new(
        service_name: impl Into<String>,
        quantity: u32,
        customer_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            service_name: service_name.into(),
            quantity,
            total_cost: flat_rate_total(quantity),
            customer_name: customer_name.into(),
            order_date: now_epoch_ms(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
        }
    }
}

/// Order total for `quantity` units at `FLAT_UNIT_RATE`.
pub fn flat_rate_total(quantity: u32) -> f64 {
    f64::from(quantity) * FLAT_UNIT_RATE
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

impl Record for Order {
    const SLOT: &'static str = "orders";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn prepare_insert(&mut self) {
        self.total_cost = flat_rate_total(self.quantity);
    }

    fn prepare_replace(&mut self, previous: &Self) {
        self.order_date = previous.order_date;
        self.total_cost = flat_rate_total(self.quantity);
    }

    fn amounts(&self) -> Vec<(&'static str, f64)> {
        vec![("total_cost", self.total_cost)]
    }
}

#[cfg(test)]
mod tests {
    use super::{flat_rate_total, Order, OrderStatus, PaymentStatus};

    #[test]
    fn new_order_defaults_to_pending_unpaid() {
        let order = Order::new("Ceramic Install", 3, "Jane Doe");
        assert!(order.id.is_nil());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Unpaid);
        assert_eq!(order.total_cost, 300.0);
        assert!(order.order_date > 0);
    }

    #[test]
    fn flat_rate_ignores_service_price() {
        assert_eq!(flat_rate_total(0), 0.0);
        assert_eq!(flat_rate_total(7), 700.0);
    }

    #[test]
    fn status_labels_parse_case_insensitively() {
        assert_eq!(OrderStatus::parse_label(" completed "), Some(OrderStatus::Completed));
        assert_eq!(PaymentStatus::parse_label("PAID"), Some(PaymentStatus::Paid));
        assert_eq!(OrderStatus::parse_label("shipped"), None);
        assert_eq!(OrderStatus::Pending.label(), "Pending");
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let json = serde_json::to_value(OrderStatus::Completed).unwrap();
        assert_eq!(json, "completed");
        let json = serde_json::to_value(PaymentStatus::Unpaid).unwrap();
        assert_eq!(json, "unpaid");
    }
}
