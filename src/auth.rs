//! Credential primitives: password hashing and bearer tokens.
//!
//! Passwords are hashed with PBKDF2-SHA256 and a per-user random salt,
//! verified in constant time. Bearer tokens are opaque random strings;
//! only their SHA-256 hash is stored server-side.

use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;

const B64: base64::engine::GeneralPurpose = base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Hash a password into the stored format
/// `pbkdf2$<iterations>$<salt_b64>$<hash_b64>`.
pub fn hash_password(password: &str) -> String {
    let salt = random_bytes::<SALT_LENGTH>();
    encode_password_hash(password, &salt, PBKDF2_ITERATIONS)
}

fn encode_password_hash(password: &str, salt: &[u8; SALT_LENGTH], iterations: u32) -> String {
    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut hash);
    format!(
        "pbkdf2${iterations}${}${}",
        B64.encode(salt),
        B64.encode(hash)
    )
}

/// Verify a password against a stored hash. Malformed stored hashes
/// verify as false rather than erroring; a corrupt row must not become a
/// login bypass.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some("pbkdf2"), Some(iter_str), Some(salt_b64), Some(hash_b64), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    let Ok(iterations) = iter_str.parse::<u32>() else {
        return false;
    };
    let Ok(salt) = B64.decode(salt_b64) else {
        return false;
    };
    let Ok(expected) = B64.decode(hash_b64) else {
        return false;
    };
    if salt.len() != SALT_LENGTH || expected.len() != HASH_LENGTH {
        return false;
    }

    let mut salt_arr = [0u8; SALT_LENGTH];
    salt_arr.copy_from_slice(&salt);
    let mut actual = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt_arr, iterations, &mut actual);

    actual.ct_eq(expected.as_slice()).into()
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    B64.encode(random_bytes::<32>())
}

/// Hash a bearer token for storage and lookup.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    B64.encode(hasher.finalize())
}

fn random_bytes<const N: usize>() -> [u8; N] {
    use rand::RngCore;
    let mut bytes = [0u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}
