//! Opaque bearer tokens.
//!
//! Raw token values are random bytes rendered as URL-safe base64. Only their
//! SHA-256 digest is stored, so a leaked token table cannot be replayed.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::user::TokenValidationInfo;

/// Generate a fresh raw token value of `size_in_bytes` random bytes.
pub fn generate_token_value(size_in_bytes: usize) -> String {
    let mut bytes = vec![0u8; size_in_bytes];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE.encode(bytes)
}

/// Derive the stored validation artifact of a raw token value.
pub fn create_validation_information(token: &str) -> TokenValidationInfo {
    let hash = Sha256::digest(token.as_bytes());
    TokenValidationInfo::new(format!("{hash:x}"))
}

/// Cheap shape check: does `token` decode to exactly `size_in_bytes` bytes?
pub fn can_be_token(token: &str, size_in_bytes: usize) -> bool {
    URL_SAFE
        .decode(token)
        .map(|bytes| bytes.len() == size_in_bytes)
        .unwrap_or(false)
}
