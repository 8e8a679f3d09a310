//! Order errors.

use thiserror::Error;

use crate::{domain::orders::models::OrderUuid, store::StoreError};

/// Orders service errors.
#[derive(Debug, Error)]
pub enum OrdersServiceError {
    /// No order with the given id
    #[error("order {0} not found")]
    NotFound(OrderUuid),

    /// The order collection could not be read or written
    #[error(transparent)]
    Store(#[from] StoreError),
}
