//! Products

pub mod errors;
pub mod fixtures;
pub mod models;
pub mod service;

pub use errors::CatalogServiceError;
pub use service::*;
