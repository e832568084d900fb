//! Cache Entry Signing
//!
//! HMAC-SHA256 signatures over serialized cache values, keyed by a
//! process-wide secret configured at startup. Verification recomputes the
//! signature and compares in constant time, so an entry tampered with
//! behind the store's back is detected rather than surfaced.
//!
//! # Security Properties
//!
//! - Constant-time comparison prevents timing attacks on verification
//! - The secret is wrapped in `SecretString` to prevent accidental logging
//! - Signature comparison uses the `subtle` crate for constant-time equality

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 signer for cache entries
pub struct EntrySigner {
    secret: SecretString,
}

impl EntrySigner {
    /// Create a signer with the given process-wide secret
    ///
    /// # Security Note
    ///
    /// The secret should be at least 32 bytes of cryptographically random
    /// data and must never be derived from request input.
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Sign a serialized payload
    pub fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any size");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    /// Verify a payload against a stored signature in constant time
    pub fn verify(&self, payload: &[u8], signature: &[u8]) -> bool {
        self.sign(payload).ct_eq(signature).into()
    }
}

impl std::fmt::Debug for EntrySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntrySigner").finish_non_exhaustive()
    }
}
