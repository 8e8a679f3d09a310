//! Sessions

pub mod errors;
mod manager;
pub mod models;

pub use errors::SessionError;
pub use manager::SessionManager;
pub use models::{Session, SessionState};
