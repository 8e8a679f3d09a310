//! Order Models

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use farmony::items::CartLine;

use crate::{
    domain::customers::models::{Address, CustomerUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order lifecycle states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Recorded, not yet picked up by the pharmacy
    #[default]
    Pending,
    /// Being prepared
    Processing,
    /// Delivered and settled
    Completed,
    /// Cancelled before completion
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };

        f.pad(label)
    }
}

/// How an order is paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid in cash when the order arrives
    #[default]
    CashOnDelivery,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CashOnDelivery => f.write_str("cash on delivery"),
        }
    }
}

/// One purchased line, denormalized from the cart at checkout time so later
/// catalog edits never rewrite order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Catalog id of the purchased product
    pub id: String,
    /// Display name at purchase time
    pub name: String,
    /// Unit price at purchase time
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Units purchased
    pub quantity: u32,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.clone(),
            name: line.name.clone(),
            price: line.unit_price,
            quantity: line.quantity,
        }
    }
}

impl OrderLine {
    /// Price of the whole line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Who placed the order and where it ships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    /// The purchasing customer
    pub uid: CustomerUuid,
    /// Name for the shipping label
    pub full_name: String,
    /// Email the confirmation goes to
    pub email: String,
    /// Contact phone for the courier
    pub phone: String,
    /// Where the order ships
    pub shipping_address: Address,
}

/// A recorded order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order id
    pub id: OrderUuid,
    /// Purchaser and shipping details
    pub customer: OrderCustomer,
    /// Purchased lines
    pub items: Vec<OrderLine>,
    /// Order total at purchase time
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Lifecycle state
    pub status: OrderStatus,
    /// Payment method
    pub payment_method: PaymentMethod,
    /// Free-form delivery notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When the order was recorded
    pub created_at: Timestamp,
}

/// An order about to be recorded; the id, status, and timestamp are
/// assigned on write.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Purchaser and shipping details
    pub customer: OrderCustomer,
    /// Purchased lines
    pub items: Vec<OrderLine>,
    /// Order total
    pub total: Decimal,
    /// Free-form delivery notes
    pub notes: Option<String>,
}
