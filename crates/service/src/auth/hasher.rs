//! Keyed password digests (HMAC-SHA256, hex encoded).
//!
//! Digests are deterministic for a given key so that login can recompute and
//! compare. There is no per-account salt: equal passwords under the same key
//! produce equal digests, and rotating the key invalidates every stored digest.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::errors::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 of `plaintext` keyed by `secret`.
pub fn hash_password(plaintext: &str, secret: &str) -> Result<String, AuthError> {
    let mac = keyed(plaintext, secret)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn keyed(plaintext: &str, secret: &str) -> Result<HmacSha256, AuthError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| AuthError::HashError(e.to_string()))?;
    mac.update(plaintext.as_bytes());
    Ok(mac)
}

/// Hasher bound to the process-wide password key.
#[derive(Clone)]
pub struct CredentialHasher {
    key: String,
}

impl CredentialHasher {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        hash_password(plaintext, &self.key)
    }

    /// Recompute the digest for `plaintext` and compare it with `stored` in
    /// constant time. A stored value that is not hex never matches.
    pub fn verify(&self, plaintext: &str, stored: &str) -> Result<bool, AuthError> {
        let Ok(expected) = hex::decode(stored) else {
            return Ok(false);
        };
        Ok(keyed(plaintext, &self.key)?.verify_slice(&expected).is_ok())
    }
}
