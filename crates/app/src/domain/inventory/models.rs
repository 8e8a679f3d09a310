//! Inventory models.

use farmony::items::CartLine;

/// One product's share of a stock reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationLine {
    /// Catalog id of the product
    pub product_id: String,
    /// Display name, carried for error reporting
    pub name: String,
    /// Units to reserve
    pub quantity: u32,
}

impl From<&CartLine> for ReservationLine {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.id.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
        }
    }
}
