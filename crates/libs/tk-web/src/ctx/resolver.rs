//! Context resolver: bearer token in, request context out.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use tk_auth::{AUTH_HEADER, AUTH_HEADER_PREFIX};
use tk_models::db::connection::DbConnection;
use tk_sdk::user::{TkLoginRequest, TkUserApi, TkUserLogin};
use tower_cookies::{Cookie, Cookies};

use crate::auth_token::{AuthToken, USER_TOKEN_TTL, authenticate, decode_token, encode_token};
use crate::ctx::Ctx;
use crate::prelude::*;

/// The name of the cookie used to store authentication tokens.
pub const AUTH_TOKEN_COOKIE: &str = "auth-token";

/// Middleware that resolves the request context from the session token.
///
/// The token is taken from the auth cookie or the `Authorization: Bearer`
/// header, verified, and checked for expiry. The outcome (a [`Ctx`] or the
/// token-level error) is stored in the request extensions for downstream
/// extractors; an invalid or expired token also clears the cookie.
///
/// # Examples
///
/// ```rust
/// use axum::Router;
/// use tk_web::ctx::resolver::mw_ctx_resolver;
///
/// let app: Router<()> = Router::new()
///     .layer(axum::middleware::from_fn(mw_ctx_resolver));
/// ```
#[axum::debug_middleware]
pub async fn mw_ctx_resolver(
    cookies: Cookies,
    headers: HeaderMap,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = cookies
        .get(AUTH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| {
            headers
                .get(AUTH_HEADER)
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.strip_prefix(AUTH_HEADER_PREFIX))
                .map(|s| s.to_string())
        })
        .ok_or(tk_auth::error::Error::TokenMissing)
        .and_then(|token| decode_token(&token));

    let ctx = token.map(|token: AuthToken| Ctx::new(token.sub));

    if ctx.is_err() {
        cookies.remove(Cookie::from(AUTH_TOKEN_COOKIE));
    }
    req.extensions_mut().insert(ctx);

    next.run(req).await
}

/// Logs a user in and sets the authentication cookie.
///
/// Issues a session token with a 1-day expiry bound to the user's ID.
/// Issuance is stateless: nothing is persisted server-side beyond the
/// original user record.
pub fn login_user(
    auth: &TkLoginRequest,
    connection: &DbConnection,
    cookies: &Cookies,
) -> Result<TkUserLogin> {
    let user = authenticate(auth, connection)?;
    let claims = AuthToken::new(&user.id, USER_TOKEN_TTL)?;
    let token = encode_token(&claims)?;
    cookies.add(Cookie::new(AUTH_TOKEN_COOKIE, token.clone()));

    Ok(TkUserLogin {
        success: true,
        token,
        user: TkUserApi {
            id: user.id,
            email: user.email,
            name: user.name,
        },
    })
}

impl<S: Send + Sync> FromRequestParts<S> for Ctx {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        Ok(parts
            .extensions
            .get::<core::result::Result<Ctx, tk_auth::error::Error>>()
            .ok_or(Error::CtxMissing)?
            .clone()?)
    }
}
