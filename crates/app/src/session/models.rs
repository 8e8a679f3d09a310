//! Session Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::domain::customers::models::CustomerUuid;

/// An authenticated storefront session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The signed-in customer.
    pub customer: CustomerUuid,
    /// Email the customer signed in with.
    pub email: String,
    /// Name shown in greetings and prefilled into checkout.
    pub display_name: String,
    /// When the session was issued.
    pub signed_in_at: Timestamp,
}

/// Who the current session belongs to, if anyone.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// No one is signed in.
    #[default]
    Anonymous,
    /// A customer is signed in.
    Authenticated(Session),
}

impl SessionState {
    /// The session, when one is active.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(session) => Some(session),
        }
    }

    /// Whether a customer is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}
