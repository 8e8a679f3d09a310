//! Checkout errors.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    carts::errors::CartStoreError, customers::errors::CustomersServiceError,
    inventory::errors::ReservationError, orders::errors::OrdersServiceError,
};

/// Checkout errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout requires a signed-in session
    #[error("sign in to check out")]
    NotAuthenticated,

    /// The cart has no lines
    #[error("the cart is empty")]
    EmptyCart,

    /// No shipping address was given and none is on file
    #[error("no shipping address on file; provide one")]
    MissingAddress,

    /// The cart could not be read
    #[error(transparent)]
    Cart(#[from] CartStoreError),

    /// The signed-in customer's profile could not be loaded
    #[error(transparent)]
    Customer(#[from] CustomersServiceError),

    /// Stock reservation failed; no stock was decremented
    #[error(transparent)]
    Reservation(#[from] ReservationError),

    /// Stock was reserved but the order write failed. The decremented stock
    /// has no matching order; support reconciles it by reference.
    #[error("the order could not be recorded; contact support with reference {reference}")]
    OrderWriteFailed {
        /// Reference identifying this checkout attempt in the logs
        reference: Uuid,
        /// The underlying write failure
        #[source]
        source: OrdersServiceError,
    },
}
