//! Inventory

pub mod errors;
pub mod models;
pub mod service;

pub use errors::ReservationError;
pub use service::*;
