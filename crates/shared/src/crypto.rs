//! Cryptographic utilities for session tokens and report identifiers.

use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Number of random bytes in a session token (hex-encoded to twice as many chars).
const SESSION_TOKEN_BYTES: usize = 32;

/// Length of a report identifier.
pub const REPORT_ID_LEN: usize = 8;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates an opaque session token from the OS-seeded thread RNG.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generates a report identifier: the first eight characters of a random
/// UUID, uppercased.
pub fn generate_report_id() -> String {
    Uuid::new_v4().simple().to_string()[..REPORT_ID_LEN].to_uppercase()
}
