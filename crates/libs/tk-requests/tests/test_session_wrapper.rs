//! Behavior of the session wrapper against a throwaway local server.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tk_requests::ApiClient;
use tk_sdk::user::{TkLoginRequest, TkSignupRequest, TkUserApi, TkUserCreated, TkUserLogin};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct EchoAuth {
    authorization: Option<String>,
}

async fn echo_auth(headers: HeaderMap) -> Json<EchoAuth> {
    Json(EchoAuth {
        authorization: headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .map(String::from),
    })
}

async fn login(Json(_payload): Json<TkLoginRequest>) -> Json<TkUserLogin> {
    Json(TkUserLogin {
        success: true,
        token: String::from("issued-token"),
        user: TkUserApi {
            id: Uuid::new_v4(),
            email: String::from("a@x.com"),
            name: None,
        },
    })
}

async fn signup(Json(_payload): Json<TkSignupRequest>) -> (StatusCode, Json<TkUserCreated>) {
    (
        StatusCode::CREATED,
        Json(TkUserCreated {
            message: String::from("User created"),
            user_id: Uuid::new_v4(),
            token: None,
        }),
    )
}

async fn protected() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"success": false, "message": "Authentication token expired"})),
    )
}

async fn missing() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"success": false, "message": "Ticket not found"})),
    )
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/v1/echo-auth", get(echo_auth))
        .route("/v1/login", post(login))
        .route("/v1/signup", post(signup))
        .route("/v1/protected", get(protected))
        .route("/v1/missing", get(missing))
        .route("/v1/broken", get(broken));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server died");
    });
    format!("http://{addr}/v1")
}

#[tokio::test]
async fn bearer_header_present_iff_token_stored() {
    let client = ApiClient::new(spawn_server().await);

    let echo: EchoAuth = client.get("echo-auth").await.unwrap();
    assert_eq!(echo.authorization, None);

    client.session().set_token("t1");
    let echo: EchoAuth = client.get("echo-auth").await.unwrap();
    assert_eq!(echo.authorization, Some(String::from("Bearer t1")));

    client.logout();
    let echo: EchoAuth = client.get("echo-auth").await.unwrap();
    assert_eq!(echo.authorization, None);
}

#[tokio::test]
async fn unauthorized_clears_token_and_fires_hook_once() {
    let hook_calls = Arc::new(AtomicUsize::new(0));
    let calls = hook_calls.clone();
    let client = ApiClient::new(spawn_server().await)
        .on_auth_failure(move || {
            calls.fetch_add(1, Ordering::SeqCst);
        });

    client.session().set_token("stale-token");

    let result: Result<EchoAuth, _> = client.get("protected").await;
    let err = result.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Authentication token expired");
    assert_eq!(hook_calls.load(Ordering::SeqCst), 1);
    assert_eq!(client.session().token(), None);

    // The next request must go out without the header.
    let echo: EchoAuth = client.get("echo-auth").await.unwrap();
    assert_eq!(echo.authorization, None);
}

#[tokio::test]
async fn non_auth_errors_leave_the_session_alone() {
    let client = ApiClient::new(spawn_server().await);
    client.session().set_token("t1");

    let result: Result<EchoAuth, _> = client.get("missing").await;
    let err = result.unwrap_err();
    assert!(!err.is_unauthorized());
    assert_eq!(err.to_string(), "Ticket not found");
    assert_eq!(client.session().token(), Some(String::from("t1")));
}

#[tokio::test]
async fn unparseable_error_body_gets_the_generic_message() {
    let client = ApiClient::new(spawn_server().await);

    let result: Result<EchoAuth, _> = client.get("broken").await;
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "request failed with status 500");
}

#[tokio::test]
async fn login_persists_token_and_signup_does_not() {
    let client = ApiClient::new(spawn_server().await);

    let created = client
        .signup(&TkSignupRequest {
            email: String::from("a@x.com"),
            password: String::from("p1"),
            name: None,
        })
        .await
        .unwrap();
    assert_eq!(created.token, None);
    assert_eq!(client.session().token(), None);

    let login = client
        .login(&TkLoginRequest::new("a@x.com", "p1"))
        .await
        .unwrap();
    assert!(login.success);
    assert_eq!(client.session().token(), Some(login.token));
}
