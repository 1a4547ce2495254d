//! Argon2id password hashing, verification, and the password policy.
//!
//! Hashes use the Argon2id variant with a random salt from [`OsRng`] and are
//! stored in PHC string format, so parameters and salt travel with the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::domain::user::PasswordValidationInfo;

/// Hash a plaintext password into its stored validation artifact.
pub fn hash_password(password: &str) -> Result<PasswordValidationInfo, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(PasswordValidationInfo::new(hash.to_string()))
}

/// Check a plaintext password against a stored validation artifact.
///
/// A malformed artifact never matches.
pub fn verify_password(password: &str, info: &PasswordValidationInfo) -> bool {
    let Ok(parsed) = PasswordHash::new(info.as_str()) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Whether a password satisfies the minimum length policy.
pub fn is_safe_password(password: &str, min_length: usize) -> bool {
    password.chars().count() >= min_length
}
