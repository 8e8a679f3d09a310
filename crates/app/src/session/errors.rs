//! Session errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the session document failed.
    #[error("session document io failed")]
    Io(#[from] std::io::Error),

    /// The session document could not be encoded.
    #[error("session document codec failed")]
    Codec(#[from] serde_json::Error),
}
