//! Customer errors.

use thiserror::Error;

use crate::{domain::customers::models::CustomerUuid, store::StoreError};

/// Customers service errors.
#[derive(Debug, Error)]
pub enum CustomersServiceError {
    /// The email is already registered
    #[error("email is already registered")]
    EmailTaken,

    /// Unknown email or wrong password; the caller cannot tell which
    #[error("invalid email or password")]
    InvalidCredentials,

    /// No customer with the given id
    #[error("customer {0} not found")]
    NotFound(CustomerUuid),

    /// The customer collections could not be read or written
    #[error(transparent)]
    Store(#[from] StoreError),
}
