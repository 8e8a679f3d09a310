//! Snapshots
//!
//! The persisted form of a cart is a single JSON document carrying a schema
//! version tag and the serialized lines. Loading tolerates every malformed
//! shape earlier storefront builds wrote: string prices, fractional or
//! missing quantities, missing ids, duplicated lines. A snapshot whose
//! version tag does not match the current schema is discarded whole, never
//! partially migrated.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    cart::Cart,
    items::{CartLine, slugify},
    prices::{self, RawPrice},
};

/// Current snapshot schema version tag.
pub const SCHEMA_VERSION: &str = "3.1";

#[derive(Debug, Serialize)]
struct SnapshotDocument<'a> {
    #[serde(rename = "schemaVersion")]
    schema_version: &'a str,
    items: Vec<StoredLine<'a>>,
}

#[derive(Debug, Serialize)]
struct StoredLine<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    quantity: u32,
    image: Option<&'a str>,
    category: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(rename = "schemaVersion")]
    schema_version: Option<String>,
    #[serde(default)]
    items: Vec<RawLine>,
}

/// A line as found in persisted data: every field optional, prices and
/// quantities in whatever shape an older build left them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLine {
    /// Product identifier, absent in legacy snapshots.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Price as number or formatted string.
    #[serde(default)]
    pub price: Option<RawPrice>,
    /// Quantity as number or numeric string.
    #[serde(default)]
    pub quantity: Option<RawQuantity>,
    /// Optional display image.
    #[serde(default)]
    pub image: Option<String>,
    /// Optional display category.
    #[serde(default)]
    pub category: Option<String>,
}

/// A persisted quantity: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    /// A bare numeric quantity.
    Number(serde_json::Number),
    /// A numeric string.
    Text(String),
}

impl RawQuantity {
    /// Coerce to a positive integer, defaulting to 1 for anything that does
    /// not parse or falls below 1. Fractional quantities truncate.
    #[must_use]
    pub fn coerce(&self) -> u32 {
        match self {
            Self::Number(number) => {
                if let Some(integer) = number.as_u64() {
                    u32::try_from(integer).unwrap_or(u32::MAX).max(1)
                } else {
                    number.as_f64().map_or(1, coerce_float)
                }
            }
            Self::Text(text) => {
                let trimmed = text.trim();

                trimmed.parse::<u32>().map_or_else(
                    |_| trimmed.parse::<f64>().map_or(1, coerce_float),
                    |quantity| quantity.max(1),
                )
            }
        }
    }
}

fn coerce_float(value: f64) -> u32 {
    Decimal::try_from(value)
        .ok()
        .map(|decimal| decimal.trunc())
        .and_then(|decimal| decimal.to_u32())
        .map_or(1, |quantity| quantity.max(1))
}

/// Why a persisted snapshot was discarded wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    /// The payload was not a decodable snapshot document.
    Malformed,
    /// The version tag was absent or differs from [`SCHEMA_VERSION`].
    VersionMismatch {
        /// The tag found in the payload, when there was one.
        found: Option<String>,
    },
}

/// Outcome of loading a persisted snapshot.
#[derive(Debug, Default)]
pub struct LoadedCart {
    /// The sanitized cart; empty when the snapshot was discarded.
    pub cart: Cart,
    /// Lines dropped for a missing name or non-positive price.
    pub dropped: usize,
    /// Lines folded into an earlier line with the same id.
    pub merged: usize,
    /// Set when the whole snapshot was thrown away.
    pub discarded: Option<DiscardReason>,
}

/// Decode a persisted snapshot.
///
/// A payload that does not parse, or whose `schemaVersion` differs from the
/// current schema, is discarded whole (empty cart, reason reported); stale
/// formats are wiped, not migrated. Surviving lines go through
/// [`sanitize`].
#[must_use]
pub fn decode(payload: &str) -> LoadedCart {
    let raw: RawSnapshot = match serde_json::from_str(payload) {
        Ok(raw) => raw,
        Err(_) => {
            return LoadedCart {
                discarded: Some(DiscardReason::Malformed),
                ..LoadedCart::default()
            };
        }
    };

    if raw.schema_version.as_deref() != Some(SCHEMA_VERSION) {
        return LoadedCart {
            discarded: Some(DiscardReason::VersionMismatch {
                found: raw.schema_version,
            }),
            ..LoadedCart::default()
        };
    }

    sanitize(raw.items)
}

/// Sanitize raw lines into a cart.
///
/// Per line: a missing id is synthesized from the slugified name (with a
/// deterministic `-2`, `-3`, … suffix when the slug is already claimed by a
/// line with a different name); the quantity is coerced to a positive
/// integer defaulting to 1; the price is normalized from string-or-number.
/// Lines with no usable name or a non-positive price are dropped. Lines
/// sharing an id are then merged by summing quantities, keeping the first
/// occurrence's price and metadata.
///
/// The whole pass is deterministic, so loading the same snapshot twice
/// yields the same cart both times.
#[must_use]
pub fn sanitize(lines: Vec<RawLine>) -> LoadedCart {
    let mut sanitized: Vec<CartLine> = Vec::with_capacity(lines.len());
    let mut index_by_id: FxHashMap<String, usize> = FxHashMap::default();
    let mut name_by_id: FxHashMap<String, String> = FxHashMap::default();
    let mut dropped = 0_usize;
    let mut merged = 0_usize;

    for raw in lines {
        let Some(name) = raw
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
        else {
            dropped += 1;
            continue;
        };

        let Some(unit_price) = raw.price.as_ref().and_then(prices::normalize) else {
            dropped += 1;
            continue;
        };

        let quantity = raw.quantity.as_ref().map_or(1, RawQuantity::coerce);

        let explicit = raw
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        let id = match explicit {
            Some(id) => id,
            None => match synthesize_id(name, &name_by_id) {
                Some(id) => id,
                None => {
                    dropped += 1;
                    continue;
                }
            },
        };

        name_by_id
            .entry(id.clone())
            .or_insert_with(|| name.to_string());

        if let Some(&index) = index_by_id.get(&id) {
            if let Some(existing) = sanitized.get_mut(index) {
                existing.quantity = existing.quantity.saturating_add(quantity);
                merged += 1;
            }
        } else {
            index_by_id.insert(id.clone(), sanitized.len());
            sanitized.push(CartLine {
                id,
                name: name.to_string(),
                unit_price,
                quantity,
                image: raw.image,
                category: raw.category,
            });
        }
    }

    LoadedCart {
        cart: Cart::from_lines(sanitized),
        dropped,
        merged,
        discarded: None,
    }
}

/// Pick an id for a nameless-id line: the bare slug when free or already
/// owned by the same name (which merges), otherwise the first free
/// ordinal-suffixed variant.
fn synthesize_id(name: &str, name_by_id: &FxHashMap<String, String>) -> Option<String> {
    let base = slugify(name)?;
    let mut candidate = base.clone();
    let mut ordinal = 2_usize;

    loop {
        match name_by_id.get(&candidate) {
            None => return Some(candidate),
            Some(owner) if owner == name => return Some(candidate),
            Some(_) => {
                candidate = format!("{base}-{ordinal}");
                ordinal += 1;
            }
        }
    }
}

/// Serialize a cart under the current schema version tag. Prices are written
/// as JSON numbers.
///
/// # Errors
///
/// Returns an error when JSON serialization fails.
pub fn encode(cart: &Cart) -> Result<String, serde_json::Error> {
    let document = SnapshotDocument {
        schema_version: SCHEMA_VERSION,
        items: cart
            .lines()
            .iter()
            .map(|line| StoredLine {
                id: &line.id,
                name: &line.name,
                price: line.unit_price,
                quantity: line.quantity,
                image: line.image.as_deref(),
                category: line.category.as_deref(),
            })
            .collect(),
    };

    serde_json::to_string(&document)
}
