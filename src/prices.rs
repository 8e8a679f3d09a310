//! Prices
//!
//! Product prices arrive in whatever shape the catalog or an old persisted
//! snapshot carries: a plain number, or a formatted string like `"$1,299.50"`.
//! Everything is funnelled through [`normalize`] before it reaches a cart.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of decimal places a normalized price carries.
pub const PRICE_SCALE: u32 = 2;

/// A price as found in product payloads or persisted snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    /// A bare numeric price.
    Number(f64),
    /// A formatted price string, possibly with a currency symbol and
    /// thousands separators.
    Text(String),
}

impl From<f64> for RawPrice {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawPrice {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawPrice {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Normalize a raw price into a positive amount with [`PRICE_SCALE`] decimal
/// places.
///
/// Strings are trimmed and stripped of a leading `$` and any `,` separators
/// before parsing. Unparseable, non-finite, and non-positive prices all
/// normalize to `None`.
#[must_use]
pub fn normalize(raw: &RawPrice) -> Option<Decimal> {
    let value = match raw {
        RawPrice::Number(number) => Decimal::try_from(*number).ok()?,
        RawPrice::Text(text) => parse_text(text)?,
    };

    let value = value.round_dp(PRICE_SCALE);

    (value > Decimal::ZERO).then_some(value)
}

fn parse_text(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    let without_symbol = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let cleaned: String = without_symbol
        .chars()
        .filter(|character| *character != ',')
        .collect();

    Decimal::from_str(cleaned.trim()).ok()
}
