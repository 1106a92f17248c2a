//! Form input parsing for add/edit flows.
//!
//! # Responsibility
//! - Turn raw text fields from the UI into records the stores accept.
//! - Reject empty required fields and unparsable numbers before any store
//!   call happens.
//!
//! # Invariants
//! - Text fields are stored trimmed.
//! - Edits keep the identity (and, for orders, the date) of the record
//!   being edited.
//! - Order quantity must be a positive integer.

use crate::model::customer::Customer;
use crate::model::order::{flat_rate_total, Order, OrderStatus, PaymentStatus};
use crate::model::service_offering::ServiceOffering;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Required field is empty or whitespace only.
    MissingField(&'static str),
    /// Field does not parse as the expected number.
    InvalidNumber { field: &'static str, value: String },
    /// Edited service cost fields must be non-zero.
    ZeroAmount(&'static str),
    /// Order quantity parsed but is zero.
    NonPositiveQuantity,
    /// Status label matches no known status.
    UnknownStatus { field: &'static str, value: String },
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidNumber { field, value } => {
                write!(f, "{field} must be a number, got `{value}`")
            }
            Self::ZeroAmount(field) => write!(f, "{field} must not be zero"),
            Self::NonPositiveQuantity => write!(f, "quantity must be a positive integer"),
            Self::UnknownStatus { field, value } => write!(f, "unknown {field} `{value}`"),
        }
    }
}

impl Error for FormError {}

/// Raw fields of the add/edit service form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceForm {
    pub name: String,
    pub kind: String,
    pub cost: String,
    pub labor_cost: String,
    pub time_required: String,
    pub description: String,
    pub material: String,
}

impl ServiceForm {
    /// Prefills the form from an existing offering for editing.
    pub fn from_offering(offering: &ServiceOffering) -> Self {
        Self {
            name: offering.name.clone(),
            kind: offering.kind.clone(),
            cost: offering.cost.to_string(),
            labor_cost: offering.labor_cost.to_string(),
            time_required: offering.time_required.clone(),
            description: offering.description.clone(),
            material: offering.material.clone(),
        }
    }

    /// Builds a new offering (without id) from the add form.
    pub fn to_new_offering(&self) -> Result<ServiceOffering, FormError> {
        let name = required("name", &self.name)?;
        let kind = required("type", &self.kind)?;
        let material = required("material", &self.material)?;
        let cost = parse_amount("cost", &self.cost)?;
        let labor_cost = parse_amount("labor cost", &self.labor_cost)?;
        let time_required = required("time required", &self.time_required)?;

        let mut offering = ServiceOffering::new(name, kind, cost, labor_cost);
        offering.time_required = time_required;
        offering.description = self.description.trim().to_string();
        offering.material = material;
        Ok(offering)
    }

    /// Applies the edit form to `existing`, keeping its id.
    ///
    /// Stricter than the add form: zero costs are rejected.
    pub fn to_edited_offering(
        &self,
        existing: &ServiceOffering,
    ) -> Result<ServiceOffering, FormError> {
        let mut offering = self.to_new_offering()?;
        if offering.cost == 0.0 {
            return Err(FormError::ZeroAmount("cost"));
        }
        if offering.labor_cost == 0.0 {
            return Err(FormError::ZeroAmount("labor cost"));
        }
        offering.id = existing.id;
        Ok(offering)
    }
}

/// Raw fields of the add/edit customer form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerForm {
    pub name: String,
    pub contact_info: String,
    pub address: String,
}

impl CustomerForm {
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            contact_info: customer.contact_info.clone(),
            address: customer.address.clone(),
        }
    }

    pub fn to_new_customer(&self) -> Result<Customer, FormError> {
        Ok(Customer::new(
            required("name", &self.name)?,
            required("contact info", &self.contact_info)?,
            required("address", &self.address)?,
        ))
    }

    pub fn to_edited_customer(&self, existing: &Customer) -> Result<Customer, FormError> {
        let mut customer = self.to_new_customer()?;
        customer.id = existing.id;
        Ok(customer)
    }
}

/// Raw fields of the add/edit order form.
///
/// Empty status fields fall back to `Pending` / `Unpaid`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    pub service_name: String,
    pub quantity: String,
    pub customer_name: String,
    pub status: String,
    pub payment_status: String,
}

impl OrderForm {
    pub fn from_order(order: &Order) -> Self {
        Self {
            service_name: order.service_name.clone(),
            quantity: order.quantity.to_string(),
            customer_name: order.customer_name.clone(),
            status: order.status.label().to_string(),
            payment_status: order.payment_status.label().to_string(),
        }
    }

    /// Builds a new order dated now, priced at the flat unit rate.
    pub fn to_new_order(&self) -> Result<Order, FormError> {
        let service_name = required("service name", &self.service_name)?;
        let quantity = parse_quantity(&self.quantity)?;
        let customer_name = required("customer name", &self.customer_name)?;

        let mut order = Order::new(service_name, quantity, customer_name);
        order.status = parse_order_status(&self.status)?;
        order.payment_status = parse_payment_status(&self.payment_status)?;
        Ok(order)
    }

    /// Applies the edit form to `existing`, keeping its id and date.
    pub fn to_edited_order(&self, existing: &Order) -> Result<Order, FormError> {
        let mut order = existing.clone();
        order.service_name = required("service name", &self.service_name)?;
        order.quantity = parse_quantity(&self.quantity)?;
        order.total_cost = flat_rate_total(order.quantity);
        order.customer_name = required("customer name", &self.customer_name)?;
        order.status = parse_order_status(&self.status)?;
        order.payment_status = parse_payment_status(&self.payment_status)?;
        Ok(order)
    }
}

fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn parse_amount(field: &'static str, value: &str) -> Result<f64, FormError> {
    let trimmed = required(field, value)?;
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(FormError::InvalidNumber {
            field,
            value: trimmed,
        }),
    }
}

fn parse_quantity(value: &str) -> Result<u32, FormError> {
    let trimmed = required("quantity", value)?;
    // Parse signed first so "-2" reports a sign problem, not a format problem.
    match trimmed.parse::<i64>() {
        Ok(quantity) if quantity <= 0 => Err(FormError::NonPositiveQuantity),
        Ok(quantity) => u32::try_from(quantity).map_err(|_| FormError::InvalidNumber {
            field: "quantity",
            value: trimmed,
        }),
        Err(_) => Err(FormError::InvalidNumber {
            field: "quantity",
            value: trimmed,
        }),
    }
}

fn parse_order_status(value: &str) -> Result<OrderStatus, FormError> {
    if value.trim().is_empty() {
        return Ok(OrderStatus::default());
    }
    OrderStatus::parse_label(value).ok_or_else(|| FormError::UnknownStatus {
        field: "order status",
        value: value.trim().to_string(),
    })
}

fn parse_payment_status(value: &str) -> Result<PaymentStatus, FormError> {
    if value.trim().is_empty() {
        return Ok(PaymentStatus::default());
    }
    PaymentStatus::parse_label(value).ok_or_else(|| FormError::UnknownStatus {
        field: "payment status",
        value: value.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_quantity, FormError};

    #[test]
    fn parse_quantity_rejects_zero_negative_and_text() {
        assert_eq!(parse_quantity(" 4 "), Ok(4));
        assert_eq!(parse_quantity("0"), Err(FormError::NonPositiveQuantity));
        assert_eq!(parse_quantity("-2"), Err(FormError::NonPositiveQuantity));
        assert_eq!(
            parse_quantity("three"),
            Err(FormError::InvalidNumber {
                field: "quantity",
                value: "three".to_string()
            })
        );
        assert_eq!(parse_quantity(""), Err(FormError::MissingField("quantity")));
    }
}
