//! Customer Models

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::{domain::customers::credentials::CredentialDigest, uuids::TypedUuid};

/// Customer UUID
pub type CustomerUuid = TypedUuid<Customer>;

/// A shipping address in Mexican postal format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street name
    pub street: String,
    /// Exterior number
    pub exterior_number: String,
    /// Interior number, for apartments and offices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interior_number: Option<String>,
    /// Neighborhood (colonia)
    pub neighborhood: String,
    /// City
    pub city: String,
    /// State
    pub state: String,
    /// Postal code
    pub zip_code: String,
    /// Preferred address, prefilled into checkout
    #[serde(rename = "default")]
    pub is_default: bool,
}

impl Address {
    /// Whether two addresses point at the same place, regardless of which
    /// one is marked preferred.
    #[must_use]
    pub fn same_location(&self, other: &Self) -> bool {
        self.street == other.street
            && self.exterior_number == other.exterior_number
            && self.interior_number == other.interior_number
            && self.neighborhood == other.neighborhood
            && self.city == other.city
            && self.state == other.state
            && self.zip_code == other.zip_code
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.street, self.exterior_number)?;

        if let Some(interior) = &self.interior_number {
            write!(f, " Int {interior}")?;
        }

        write!(
            f,
            ", {}, {}, {}, CP {}",
            self.neighborhood, self.city, self.state, self.zip_code
        )
    }
}

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Customer id
    pub uid: CustomerUuid,
    /// Full name
    pub full_name: String,
    /// Sign-in email, stored lowercased
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Salted password digest
    pub credential: CredentialDigest,
    /// Saved shipping addresses
    #[serde(default)]
    pub addresses: Vec<Address>,
    /// When the account was created
    pub created_at: Timestamp,
}

impl Customer {
    /// The address checkout should prefill: the preferred one, else the
    /// first saved one.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|address| address.is_default)
            .or_else(|| self.addresses.first())
    }
}

/// A registration request. The password is wiped from memory when the
/// request is dropped.
#[derive(Clone)]
pub struct NewCustomer {
    /// Full name
    pub full_name: String,
    /// Sign-in email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Plain-text password, digested before storage
    pub password: Zeroizing<String>,
}
