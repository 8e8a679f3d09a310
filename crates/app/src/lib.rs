//! Farmony storefront services: sessions, catalog, cart store, inventory
//! reservation, orders, customers, and notifications over an embedded
//! document store.

pub mod context;
pub mod domain;
pub mod notify;
pub mod session;
pub mod store;

#[cfg(test)]
mod test;

mod uuids;
