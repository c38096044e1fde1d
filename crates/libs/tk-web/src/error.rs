//! Main Crate Error

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::error;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Models(#[from] tk_models::error::Error),

    #[error(transparent)]
    Auth(#[from] tk_auth::error::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /* Api Errors */
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid credentials")]
    WrongCredentials,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Ticket not found")]
    TicketNotFound,

    #[error("Title and description are required")]
    InvalidTicketInput,

    #[error("API Forbidden")]
    ApiForbidden,

    #[error("Auth Token Creation")]
    AuthTokenCreation,

    #[error("Context Missing")]
    CtxMissing,
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        error!("Creating API error response for error: {:?}", self);
        let (status, message) = self.status_and_message();

        let body = Json(json!({
            "success": false,
            "message": message
        }));
        (status, body).into_response()
    }
}

impl Error {
    /// Maps every failure to a stable externally-visible status code.
    ///
    /// Internal detail (storage errors, token machinery) collapses to a
    /// generic 500; nothing beyond the message ever reaches the caller.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Error::MissingCredentials => (StatusCode::BAD_REQUEST, "Email and password are required"),
            Error::InvalidTicketInput => (StatusCode::BAD_REQUEST, "Title and description are required"),
            Error::WrongCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            Error::CtxMissing => (StatusCode::UNAUTHORIZED, "Missing credentials"),
            Error::UserAlreadyExists => (StatusCode::CONFLICT, "User already exists"),
            Error::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            Error::TicketNotFound => (StatusCode::NOT_FOUND, "Ticket not found"),
            Error::ApiForbidden => (StatusCode::FORBIDDEN, "Access forbidden"),
            Error::Auth(err) => match err {
                tk_auth::error::Error::InvalidToken => {
                    (StatusCode::UNAUTHORIZED, "Invalid authentication token")
                }
                tk_auth::error::Error::TokenMissing => {
                    (StatusCode::UNAUTHORIZED, "Authentication required")
                }
                tk_auth::error::Error::TokenExpired => {
                    (StatusCode::UNAUTHORIZED, "Authentication token expired")
                }
                tk_auth::error::Error::MissingSecret
                | tk_auth::error::Error::TokenCreation(_)
                | tk_auth::error::Error::PasswordHash(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                }
            },
            Error::AuthTokenCreation | Error::Json(_) | Error::Models(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}
