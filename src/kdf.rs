//! Passphrase key stretching using PBKDF2-HMAC-SHA256
//!
//! A container records its salt but not the iteration count, so the count
//! is a format constant: raising it breaks decryption of every container
//! produced with the old value.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

/// Length of salt in bytes
pub const SALT_LEN: usize = 16;

/// Length of derived key in bytes
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count (CPU cost)
const PBKDF2_ITERATIONS: u32 = 100_000;

/// Key-derivation parameters.
///
/// Every container produced by a given build uses the same parameters;
/// they exist as a struct so they are named and versionable rather than
/// hard-coded inline at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// PBKDF2 iteration count.
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: PBKDF2_ITERATIONS,
        }
    }
}

/// Derive a 32-byte key from a passphrase and salt.
///
/// Deterministic: identical inputs always produce the identical key. The
/// underlying primitive cannot fail for a 32-byte output length, so this
/// returns the key directly rather than a `Result`.
pub fn derive_key(passphrase: &[u8], salt: &[u8; SALT_LEN], params: &KdfParams) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(passphrase, salt, params.iterations, &mut key);
    key
}
