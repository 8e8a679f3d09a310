//! Cart store models.

use rust_decimal::Decimal;

use farmony::{cart::Cart, items::CartLine, prices::RawPrice};

use crate::domain::products::models::Product;

/// A candidate line item in whatever identity and price shape the caller
/// has. Prices normalize on the way into the cart.
#[derive(Debug, Clone, Default)]
pub struct ItemCandidate {
    /// Product identifier, when known
    pub id: Option<String>,
    /// Display name
    pub name: String,
    /// Price as a number or formatted string
    pub price: Option<RawPrice>,
    /// Optional display image
    pub image: Option<String>,
    /// Optional display category
    pub category: Option<String>,
}

impl From<&Product> for ItemCandidate {
    fn from(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            name: product.name.clone(),
            price: Some(RawPrice::Text(product.price.to_string())),
            image: product.image.clone(),
            category: product.category.clone(),
        }
    }
}

/// A point-in-time view of the cart, published to subscribers after every
/// accepted mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartView {
    /// Lines in insertion order
    pub lines: Vec<CartLine>,
    /// Cart total
    pub total: Decimal,
    /// Total units across all lines
    pub count: u64,
}

impl CartView {
    pub(crate) fn of(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            total: cart.total(),
            count: cart.count(),
        }
    }

    /// Whether the view holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
