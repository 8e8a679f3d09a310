//! Farmony
//!
//! Farmony is the storefront core of a retail pharmacy: a shopping-cart engine with price normalization, id-then-name identity resolution, and versioned snapshot persistence.

pub mod cart;
pub mod items;
pub mod prelude;
pub mod prices;
pub mod snapshot;
