//! Farmony prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    items::{CartLine, NewLine, slugify},
    prices::{PRICE_SCALE, RawPrice, normalize},
    snapshot::{
        DiscardReason, LoadedCart, RawLine, RawQuantity, SCHEMA_VERSION, decode, encode, sanitize,
    },
};
