//! Cart store errors.

use thiserror::Error;

use farmony::cart::CartError;

use crate::domain::carts::storage::StorageError;

/// Cart store errors.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// Cart mutations require a signed-in session
    #[error("sign in to modify the cart")]
    NotAuthenticated,

    /// The candidate line failed validation
    #[error("invalid line item: {0}")]
    InvalidItem(#[source] CartError),

    /// No cart line matched the requested item
    #[error("no cart line matches {name:?}")]
    ItemNotFound {
        /// Display name the caller tried to match
        name: String,
    },

    /// Snapshot persistence failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}
