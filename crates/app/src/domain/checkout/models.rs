//! Checkout models.

use crate::domain::customers::models::Address;

/// What the customer submits at checkout. Unset contact fields fall back to
/// the session and the stored customer profile; an unset address falls back
/// to the customer's preferred saved address.
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    /// Name for the shipping label
    pub full_name: Option<String>,
    /// Email the confirmation goes to
    pub email: Option<String>,
    /// Contact phone for the courier
    pub phone: Option<String>,
    /// Shipping address; a newly provided one is saved to the profile
    pub address: Option<Address>,
    /// Free-form delivery notes
    pub notes: Option<String>,
}
