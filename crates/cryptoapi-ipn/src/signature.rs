//! Notification signature schemes.
//!
//! The gateway signs with MD5 of the shared secret chained into SHA-1. Both
//! digests are broken for new designs; the chain exists only to interoperate
//! with the gateway and must not back any other authentication surface.

use sha1::{Digest, Sha1};

use crate::canonical::SEPARATOR;
use crate::security::constant_time_eq;

/// Signs and verifies canonical notification strings.
pub trait SignatureScheme: Send + Sync {
    /// Signature the gateway would attach to `canonical`.
    fn sign(&self, canonical: &str) -> String;

    /// True iff `claimed` equals [`sign`](Self::sign) exactly.
    ///
    /// Malformed input simply fails to match.
    fn verify(&self, canonical: &str, claimed: &str) -> bool {
        constant_time_eq(self.sign(canonical).as_bytes(), claimed.as_bytes())
    }
}

/// `sha1(canonical + ":" + md5hex(secret))`, lowercase hex.
#[derive(Clone)]
pub struct LegacySignature {
    /// Lowercase hex MD5 of the secret, computed once.
    secret_digest: String,
}

impl LegacySignature {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret_digest: format!("{:x}", md5::compute(secret.as_ref())),
        }
    }
}

impl std::fmt::Debug for LegacySignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacySignature")
            .field("secret_digest", &"[REDACTED]")
            .finish()
    }
}

impl SignatureScheme for LegacySignature {
    fn sign(&self, canonical: &str) -> String {
        let mut input = String::with_capacity(canonical.len() + 1 + self.secret_digest.len());
        input.push_str(canonical);
        input.push(SEPARATOR);
        input.push_str(&self.secret_digest);
        hex::encode(Sha1::digest(input.as_bytes()))
    }
}
