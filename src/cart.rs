//! Cart
//!
//! The cart aggregate: an ordered collection of line items with unique ids.
//! Totals are derived from the lines on every call, never cached.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::items::{CartLine, NewLine, slugify};

/// Errors surfaced by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The line's name is missing or reduces to an empty identifier.
    #[error("line item has no usable name")]
    InvalidName,

    /// The line's price is not a positive amount.
    #[error("line item has no valid price")]
    InvalidPrice,

    /// Neither the id nor the name matched a line in the cart.
    #[error("no cart line matches {name:?}")]
    LineNotFound {
        /// Display name the caller tried to match.
        name: String,
    },
}

/// The pending purchase set: line items in insertion order.
///
/// Insertion order is preserved for display only; correctness never depends
/// on it. Within a cart, line ids are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from lines that already satisfy the cart invariants
    /// (unique ids, positive prices, quantities ≥ 1), such as the output of
    /// [`crate::snapshot::sanitize`].
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines (not units; see [`Cart::count`]).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add one unit of a product.
    ///
    /// Identity is the line's `id`, falling back to the slugified name when
    /// the candidate has none. An existing line with the same id gains one
    /// unit and keeps its stored price; otherwise a new line is appended
    /// with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidPrice`] for a non-positive price and
    /// [`CartError::InvalidName`] when the name is empty or unusable as an
    /// identifier.
    pub fn add(&mut self, line: NewLine) -> Result<(), CartError> {
        if line.name.trim().is_empty() {
            return Err(CartError::InvalidName);
        }

        if line.unit_price <= Decimal::ZERO {
            return Err(CartError::InvalidPrice);
        }

        let id = match line.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => slugify(&line.name).ok_or(CartError::InvalidName)?,
        };

        if let Some(existing) = self.lines.iter_mut().find(|existing| existing.id == id) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine {
                id,
                name: line.name,
                unit_price: line.unit_price,
                quantity: 1,
                image: line.image,
                category: line.category,
            });
        }

        Ok(())
    }

    /// Remove a line, resolving identity by id first and name second.
    ///
    /// Removing an unknown line is a no-op. Returns whether a line was
    /// removed.
    pub fn remove(&mut self, id: Option<&str>, name: &str) -> bool {
        match self.position(id, name) {
            Some(index) => {
                self.lines.remove(index);
                true
            }
            None => false,
        }
    }

    /// Set a line's quantity, resolving identity by id first and name second.
    ///
    /// Requested quantities below 1 leave the cart untouched and report no
    /// change; quantities never drop below 1 through this path. Returns
    /// whether the cart changed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] when neither key matches; the
    /// caller's view of the cart may be stale and should be refreshed.
    pub fn set_quantity(
        &mut self,
        id: Option<&str>,
        name: &str,
        quantity: i64,
    ) -> Result<bool, CartError> {
        let Ok(quantity) = u32::try_from(quantity) else {
            return Ok(false);
        };

        if quantity < 1 {
            return Ok(false);
        }

        let line = self
            .line_mut(id, name)
            .ok_or_else(|| CartError::LineNotFound {
                name: name.to_string(),
            })?;

        let changed = line.quantity != quantity;
        line.quantity = quantity;

        Ok(changed)
    }

    /// Empty the cart unconditionally. Returns whether it held any lines.
    pub fn clear(&mut self) -> bool {
        let had_lines = !self.lines.is_empty();
        self.lines.clear();

        had_lines
    }

    /// Cart total: `Σ(unit_price × quantity)`, recomputed on every call.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total units across all lines, recomputed on every call.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// The id-then-name identity fallback chain. Every lookup goes through
    /// here; call sites never reimplement the ordering.
    fn position(&self, id: Option<&str>, name: &str) -> Option<usize> {
        if let Some(id) = id
            && let Some(index) = self.lines.iter().position(|line| line.id == id)
        {
            return Some(index);
        }

        self.lines.iter().position(|line| line.name == name)
    }

    fn line_mut(&mut self, id: Option<&str>, name: &str) -> Option<&mut CartLine> {
        let index = self.position(id, name)?;

        self.lines.get_mut(index)
    }
}
