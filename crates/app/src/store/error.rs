//! Document store errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A concurrent commit changed a document this transaction read. The
    /// transaction applied nothing and can be retried from the top.
    #[error("transaction conflict: a document read by this transaction was rewritten")]
    Conflict,

    /// Reading or writing the backing file failed.
    #[error("store io failed")]
    Io(#[from] std::io::Error),

    /// A document body could not be encoded or decoded.
    #[error("document codec failed")]
    Codec(#[from] serde_json::Error),
}
