//! Inventory errors.

use thiserror::Error;

use crate::store::StoreError;

/// Reservation errors.
#[derive(Debug, Error)]
pub enum ReservationError {
    /// A requested product has no catalog document
    #[error("product {product:?} is not in the catalog")]
    ProductNotFound {
        /// Catalog id of the missing product
        product: String,
    },

    /// A requested product has fewer units on hand than requested
    #[error("not enough stock of {product:?}: {available} available")]
    InsufficientStock {
        /// Catalog id of the short product
        product: String,
        /// Units on hand when the reservation was validated
        available: u32,
    },

    /// The reservation could not be committed within the retry budget
    #[error("reservation transaction failed")]
    TransactionFailed {
        /// The last store failure
        #[source]
        source: StoreError,
    },
}
