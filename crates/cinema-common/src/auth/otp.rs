//! One-time code and opaque token generation

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng, RngCore};

/// Random decimal code of exactly `len` digits, leading zeros allowed
pub fn generate_numeric_code(len: usize) -> String {
    let mut rng = OsRng;
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// 256-bit random token, URL-safe base64 without padding
pub fn generate_opaque_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Shape check for a submitted code
pub fn is_numeric_code(candidate: &str, len: usize) -> bool {
    candidate.len() == len && candidate.bytes().all(|b| b.is_ascii_digit())
}

/// Compare a submitted code against the stored one in constant time
pub fn codes_match(stored: &str, submitted: &str) -> bool {
    constant_time_eq(stored.as_bytes(), submitted.as_bytes())
}
