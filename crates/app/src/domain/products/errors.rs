//! Catalog service errors.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    /// A product with this id already exists.
    #[error("product already exists")]
    AlreadyExists,

    /// No product matches the given id.
    #[error("product not found")]
    NotFound,

    /// The price is missing, unparseable, or not positive.
    #[error("invalid price value")]
    InvalidPrice,

    /// The name is empty or unusable as an id.
    #[error("invalid product name")]
    InvalidName,

    /// The document store failed.
    #[error("storage error")]
    Store(#[from] StoreError),
}
