//! Credential digests.
//!
//! Passwords never reach the store: each customer document carries a random
//! salt and a SHA-256 digest over salt and password, both base64-encoded.

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A salted password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDigest {
    /// Per-customer random salt, base64
    pub salt: String,
    /// SHA-256 over salt and password, base64
    pub digest: String,
}

/// Digest a password under a fresh random salt.
#[must_use]
pub fn digest_password(password: &str) -> CredentialDigest {
    let mut salt = [0_u8; 16];
    OsRng.fill_bytes(&mut salt);

    CredentialDigest {
        salt: STANDARD.encode(salt),
        digest: STANDARD.encode(digest_with(&salt, password)),
    }
}

/// Whether a password matches the stored digest. An undecodable salt never
/// matches.
#[must_use]
pub fn verify_password(credential: &CredentialDigest, password: &str) -> bool {
    let Ok(salt) = STANDARD.decode(&credential.salt) else {
        return false;
    };

    STANDARD.encode(digest_with(&salt, password)) == credential.digest
}

fn digest_with(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}
