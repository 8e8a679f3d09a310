//! Items
//!
//! Cart line items and product-id synthesis.

use rust_decimal::Decimal;

/// One product entry in a cart, with its own quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    /// Stable product identifier, unique within a cart.
    pub id: String,
    /// Display label; also the secondary matching key for lines persisted
    /// before ids were introduced.
    pub name: String,
    /// Positive unit price with two decimal places.
    pub unit_price: Decimal,
    /// Units of this product, always at least 1.
    pub quantity: u32,
    /// Optional display image.
    pub image: Option<String>,
    /// Optional display category.
    pub category: Option<String>,
}

impl CartLine {
    /// Price of the whole line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A candidate line item, before identity resolution and validation.
///
/// The price is expected to have gone through [`crate::prices::normalize`]
/// already; [`crate::cart::Cart::add`] still rejects non-positive amounts.
#[derive(Debug, Clone, Default)]
pub struct NewLine {
    /// Product identifier, when the caller has one.
    pub id: Option<String>,
    /// Display label, required.
    pub name: String,
    /// Normalized unit price.
    pub unit_price: Decimal,
    /// Optional display image.
    pub image: Option<String>,
    /// Optional display category.
    pub category: Option<String>,
}

/// Reduce a display name to an identifier: lowercased alphanumerics with
/// single dashes between runs. Returns `None` when nothing identifier-worthy
/// remains.
#[must_use]
pub fn slugify(name: &str) -> Option<String> {
    let mut slug = String::with_capacity(name.len());

    for character in name.chars() {
        if character.is_alphanumeric() {
            slug.extend(character.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    (!slug.is_empty()).then_some(slug)
}
