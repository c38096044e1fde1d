//! Session token management for web requests.

use crate::prelude::*;
use chrono::{TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tk_auth::{
    ISS,
    jwt::{jwt_decode, jwt_encode},
    secret_hash::is_secret_valid,
};
use tk_models::{db::connection::DbConnection, user::TkUser};
use tk_sdk::user::TkLoginRequest;
use tracing::error;
use uuid::Uuid;

/// Validity window of a session token. Expiry is always issued-at plus this.
pub const USER_TOKEN_TTL: TimeDelta = TimeDelta::days(1);

/// JWT claims of a user session.
///
/// Possession of a valid, unexpired token is the sole authorization proof;
/// there is no server-side session table and no revocation before expiry.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthToken {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Issuer.
    pub iss: String,
    /// Expiration time.
    pub exp: i64,
    /// Issued at time.
    pub iat: i64,
}

impl AuthToken {
    /// Creates claims for a user, expiring `token_duration` from now.
    pub fn new(user: &Uuid, token_duration: TimeDelta) -> Result<Self> {
        let iat = Utc::now();
        let expiration = iat
            .checked_add_signed(token_duration)
            .ok_or(Error::AuthTokenCreation)?;

        Ok(Self {
            sub: *user,
            iss: String::from(ISS),
            exp: expiration.timestamp(),
            iat: iat.timestamp(),
        })
    }

    /// Whether the expiry lies in the past.
    ///
    /// Checked against the clock directly so the TTL window is exact; the
    /// JWT library's own expiry validation allows leeway.
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }
}

/// Authenticates a user from login credentials.
///
/// Empty fields never reach the store; an unknown email and a bad password
/// stay distinguishable so the API can answer 404 and 401 respectively.
pub fn authenticate(auth: &TkLoginRequest, connection: &DbConnection) -> Result<TkUser> {
    if auth.email.is_empty() || auth.password.is_empty() {
        return Err(Error::MissingCredentials);
    }
    let user = TkUser::find_by_email(&auth.email, connection)?.ok_or(Error::UserNotFound)?;
    let is_valid = is_secret_valid(&auth.password, &user.hash)?;
    if !is_valid {
        return Err(Error::WrongCredentials);
    }
    Ok(user)
}

/// Encodes session claims into a signed JWT string.
pub fn encode_token(token: &AuthToken) -> Result<String> {
    jwt_encode(token).map_err(|err| {
        error!("Failed to encode JWT {err}");
        Error::AuthTokenCreation
    })
}

/// Decodes and verifies a JWT string back into session claims.
///
/// Signature, structure and expiry failures all collapse into the
/// token-level error taxonomy (never into internal errors), and expiry is
/// re-checked explicitly on top of the library validation.
pub fn decode_token(token: &str) -> core::result::Result<AuthToken, tk_auth::error::Error> {
    let data = jwt_decode::<AuthToken>(token).map_err(|err| match err {
        tk_auth::error::Error::TokenCreation(err)
            if matches!(
                err.kind(),
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
            ) =>
        {
            tk_auth::error::Error::TokenExpired
        }
        _ => tk_auth::error::Error::InvalidToken,
    })?;

    if data.claims.is_expired() {
        return Err(tk_auth::error::Error::TokenExpired);
    }
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_test_secret() {
        unsafe { std::env::set_var(tk_auth::jwt::JWT_SECRET_ENV, "test-secret") };
    }

    #[test]
    fn issued_token_resolves_back_to_the_user() {
        set_test_secret();
        let user = Uuid::new_v4();
        let claims = AuthToken::new(&user, USER_TOKEN_TTL).unwrap();
        assert_eq!(claims.exp, claims.iat + USER_TOKEN_TTL.num_seconds());

        let token = encode_token(&claims).unwrap();
        let decoded = decode_token(&token).unwrap();
        assert_eq!(decoded.sub, user);
        assert!(!decoded.is_expired());
    }

    #[test]
    fn expiry_window_is_exact() {
        let now = Utc::now().timestamp();
        let fresh = AuthToken {
            sub: Uuid::new_v4(),
            iss: String::from(ISS),
            iat: now - USER_TOKEN_TTL.num_seconds() + 1,
            exp: now + 1,
        };
        assert!(!fresh.is_expired());

        let stale = AuthToken {
            sub: Uuid::new_v4(),
            iss: String::from(ISS),
            iat: now - USER_TOKEN_TTL.num_seconds() - 1,
            exp: now - 1,
        };
        assert!(stale.is_expired());
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        set_test_secret();
        let now = Utc::now().timestamp();
        let claims = AuthToken {
            sub: Uuid::new_v4(),
            iss: String::from(ISS),
            iat: now - USER_TOKEN_TTL.num_seconds(),
            exp: now - 2,
        };

        let token = encode_token(&claims).unwrap();
        let result = decode_token(&token);
        assert!(matches!(result, Err(tk_auth::error::Error::TokenExpired)));
    }

    #[test]
    fn tampered_token_is_rejected_as_invalid() {
        set_test_secret();
        let claims = AuthToken::new(&Uuid::new_v4(), USER_TOKEN_TTL).unwrap();
        let token = encode_token(&claims).unwrap();

        let mut tampered: Vec<char> = token.chars().collect();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == 'A' { 'B' } else { 'A' };
        let tampered: String = tampered.into_iter().collect();

        let result = decode_token(&tampered);
        assert!(matches!(result, Err(tk_auth::error::Error::InvalidToken)));
    }
}
