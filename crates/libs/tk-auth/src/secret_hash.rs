//! Secure password hashing and verification using Argon2.
//!
//! Passwords are hashed with a random per-hash salt, so hashing the same
//! plaintext twice yields different strings while verification stays
//! deterministic. Verification delegates entirely to the library comparator;
//! nothing in this crate compares hash bytes by hand.
//!
//! # Examples
//!
//! ```rust
//! use tk_auth::secret_hash::{generate_secret_hash, is_secret_valid};
//!
//! let hash = generate_secret_hash("user_password_123").unwrap();
//! assert!(is_secret_valid("user_password_123", &hash).unwrap());
//! assert!(!is_secret_valid("wrong_password", &hash).unwrap());
//! ```

use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{self, PasswordHashString, SaltString},
};
use rand::rngs::OsRng;

use crate::prelude::*;

/// Generates a secure hash for the provided password.
///
/// The resulting string embeds the salt and all parameters needed for
/// verification and is the only form in which a password is ever stored.
pub fn generate_secret_hash(pw: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    Ok(argon2.hash_password(pw.as_bytes(), &salt)?.to_string())
}

/// Verifies a password against a stored hash.
///
/// Extracts the salt and parameters from the hash string and re-computes the
/// hash for comparison inside the library.
pub fn is_secret_valid(pw: &str, hash: &str) -> Result<bool> {
    let hash = PasswordHashString::new(hash)?;

    Ok(Argon2::default()
        .verify_password(pw.as_bytes(), &hash.password_hash())
        .is_ok())
}

impl From<password_hash::Error> for Error {
    fn from(value: password_hash::Error) -> Self {
        Self::PasswordHash(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let hash = generate_secret_hash("p1").unwrap();
        assert!(is_secret_valid("p1", &hash).unwrap());
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = generate_secret_hash("p1").unwrap();
        assert!(!is_secret_valid("wrong", &hash).unwrap());
    }

    #[test]
    fn hash_is_salted_and_never_plaintext() {
        let first = generate_secret_hash("p1").unwrap();
        let second = generate_secret_hash("p1").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(is_secret_valid("p1", "not-a-phc-string").is_err());
    }
}
