//! Behavior of the auth middleware chain on a real router.
//!
//! Drives requests through `mw_ctx_resolver` + `mw_require_auth` exactly as
//! the daemon layers them, without a database: the protected handler only
//! echoes the resolved context.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
    routing::get,
};
use chrono::Utc;
use tk_auth::{ISS, jwt::JWT_SECRET_ENV};
use tk_web::auth_token::{AuthToken, USER_TOKEN_TTL, encode_token};
use tk_web::ctx::{Ctx, resolver::mw_ctx_resolver};
use tk_web::mw_auth::mw_require_auth;
use tower::ServiceExt;
use tower_cookies::CookieManagerLayer;
use uuid::Uuid;

async fn whoami(ctx: Ctx) -> ([(&'static str, String); 1], &'static str) {
    ([("x-user-id", ctx.user_id.to_string())], "ok")
}

fn app() -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .route_layer(middleware::from_fn(mw_require_auth))
        .layer(middleware::from_fn(mw_ctx_resolver))
        .layer(CookieManagerLayer::new())
}

fn set_test_secret() {
    unsafe { std::env::set_var(JWT_SECRET_ENV, "test-secret") };
}

fn issue_token(user: &Uuid) -> String {
    let claims = AuthToken::new(user, USER_TOKEN_TTL).unwrap();
    encode_token(&claims).unwrap()
}

#[tokio::test]
async fn absent_token_short_circuits_with_401() {
    set_test_secret();
    let request = Request::builder()
        .uri("/whoami")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get("x-user-id").is_none());
}

#[tokio::test]
async fn invalid_token_gets_401_and_the_cookie_cleared() {
    set_test_secret();
    let request = Request::builder()
        .uri("/whoami")
        .header(header::COOKIE, "auth-token=not-a-jwt")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("clearing the bad cookie requires a Set-Cookie header");
    assert!(set_cookie.starts_with("auth-token="));
}

#[tokio::test]
async fn expired_token_gets_401() {
    set_test_secret();
    let now = Utc::now().timestamp();
    let claims = AuthToken {
        sub: Uuid::new_v4(),
        iss: String::from(ISS),
        iat: now - USER_TOKEN_TTL.num_seconds(),
        exp: now - 2,
    };
    let token = encode_token(&claims).unwrap();

    let request = Request::builder()
        .uri("/whoami")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_bearer_token_reaches_the_handler_with_its_ctx() {
    set_test_secret();
    let user = Uuid::new_v4();
    let request = Request::builder()
        .uri("/whoami")
        .header(header::AUTHORIZATION, format!("Bearer {}", issue_token(&user)))
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let resolved = response
        .headers()
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .unwrap();
    assert_eq!(resolved, user.to_string());
}

#[tokio::test]
async fn valid_cookie_token_reaches_the_handler_with_its_ctx() {
    set_test_secret();
    let user = Uuid::new_v4();
    let request = Request::builder()
        .uri("/whoami")
        .header(header::COOKIE, format!("auth-token={}", issue_token(&user)))
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let resolved = response
        .headers()
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .unwrap();
    assert_eq!(resolved, user.to_string());
}
