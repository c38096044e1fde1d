//! JWT session-token management.
//!
//! Creates and validates the signed tokens that prove a prior login. Tokens
//! are signed with a symmetric secret taken from the `JWT_SECRET` environment
//! variable; there is no server-side session table, so possession of a valid,
//! unexpired token is the sole authorization proof.
//!
//! # Examples
//!
//! ```rust
//! use tk_auth::jwt::{jwt_encode, jwt_decode};
//! use serde::{Serialize, Deserialize};
//! use std::env;
//! unsafe { env::set_var("JWT_SECRET", "MySuperSecret"); }
//!
//! #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
//! struct SessionClaims {
//!     sub: String,
//!     exp: usize,
//! }
//!
//! let claims = SessionClaims {
//!     sub: "user-001".to_string(),
//!     exp: 4118335200,
//! };
//!
//! let token = jwt_encode(&claims).unwrap();
//! let decoded = jwt_decode::<SessionClaims>(&token).unwrap();
//! assert_eq!(claims, decoded.claims);
//! ```

use crate::prelude::*;
use std::sync::LazyLock;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
};
use serde::{Serialize, de::DeserializeOwned};

/// Environment variable holding the signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Lazily initialized cryptographic keys for JWT operations.
///
/// Keys are loaded once from the `JWT_SECRET` environment variable and reused
/// for all token operations. [`validate_secret`] must run at boot so this
/// initialization can never be reached with the secret absent.
static KEYS: LazyLock<Keys> = LazyLock::new(|| {
    let secret = std::env::var(JWT_SECRET_ENV).expect("JWT_SECRET must be set");
    Keys::new(secret.as_bytes())
});

/// JWT signing algorithm used throughout Ticket-Desk.
static ALGORITHM: LazyLock<Algorithm> = LazyLock::new(|| Algorithm::HS256);

/// Cryptographic key pair for JWT signing and verification.
struct Keys {
    /// Key used for signing new JWT tokens.
    encoding: EncodingKey,
    /// Key used for verifying existing JWT tokens.
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Checks that the signing secret is configured.
///
/// A missing secret is a startup-time configuration failure: the daemon calls
/// this before serving anything and exits fatally on error, instead of
/// discovering the problem at the first login.
pub fn validate_secret() -> Result<()> {
    match std::env::var(JWT_SECRET_ENV) {
        Ok(secret) if !secret.is_empty() => Ok(()),
        _ => Err(Error::MissingSecret),
    }
}

/// Creates a signed JWT token from the provided claims.
///
/// Claims are signed for integrity, not encrypted; include an `exp` claim so
/// a stolen token cannot be replayed forever.
pub fn jwt_encode<T>(body: &T) -> Result<String>
where
    T: Serialize,
{
    let header = Header::new(*ALGORITHM);
    Ok(encode(&header, body, &KEYS.encoding)?)
}

/// Validates and decodes a JWT token to extract claims.
///
/// Verifies the signature against the configured secret, checks the algorithm
/// matches HS256 and deserializes the claims. Any token signed with a
/// different secret, or with any character altered, is rejected.
pub fn jwt_decode<T>(token: &str) -> Result<TokenData<T>>
where
    T: DeserializeOwned,
{
    Ok(decode(token, &KEYS.decoding, &Validation::new(*ALGORITHM))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    struct TestClaims {
        sub: String,
        exp: usize,
    }

    fn set_test_secret() {
        unsafe { std::env::set_var(JWT_SECRET_ENV, "test-secret") };
    }

    fn claims() -> TestClaims {
        TestClaims {
            sub: String::from("2f9c1b3a-0000-0000-0000-000000000000"),
            exp: 4118335200,
        }
    }

    #[test]
    fn encode_decode_roundtrip() {
        set_test_secret();
        let token = jwt_encode(&claims()).unwrap();
        let decoded = jwt_decode::<TestClaims>(&token).unwrap();
        assert_eq!(claims(), decoded.claims);
    }

    #[test]
    fn tampered_token_is_rejected() {
        set_test_secret();
        let token = jwt_encode(&claims()).unwrap();

        let mut tampered: Vec<char> = token.chars().collect();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == 'A' { 'B' } else { 'A' };
        let tampered: String = tampered.into_iter().collect();

        assert_ne!(token, tampered);
        assert!(jwt_decode::<TestClaims>(&tampered).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        set_test_secret();
        assert!(jwt_decode::<TestClaims>("not-a-jwt").is_err());
    }

    #[test]
    fn validate_secret_reports_presence() {
        set_test_secret();
        assert!(validate_secret().is_ok());
    }
}
