//! Product Models

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Publication state of a catalog entry. Pending products are kept out of
/// the storefront until an administrator activates them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Visible and purchasable.
    #[default]
    Active,
    /// Awaiting review; hidden from the storefront.
    Pending,
}

/// Product Model
///
/// The stored document shape: stock lives on the product and is decremented
/// only through the inventory reservation transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Document id within the products collection.
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Units on hand.
    pub stock: u32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: ProductStatus,
    pub created_at: Timestamp,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Explicit id; when absent one is slugified from the name.
    pub id: Option<String>,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub image: Option<String>,
    pub category: Option<String>,
    pub status: ProductStatus,
}

/// Product Update Model
///
/// `None` fields are left unchanged. Stock written here is an
/// administrative restock, not a reservation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub image: Option<String>,
    pub category: Option<String>,
}
