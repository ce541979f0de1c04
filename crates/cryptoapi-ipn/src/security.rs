//! Constant-time comparison shared by the signature check and the server's
//! bearer-token check.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Compare a claimed notification signature (or `/metrics` bearer token)
/// with the expected value.
///
/// Exact and case-sensitive: an uppercase hex signature does not match. A
/// 39-character or empty claim costs the same as a full one, as both sides
/// are reduced to SHA-256 digests before `ct_eq`.
pub fn constant_time_eq(expected: &[u8], claimed: &[u8]) -> bool {
    let expected = Sha256::digest(expected);
    let claimed = Sha256::digest(claimed);
    expected.ct_eq(&claimed).into()
}
