//! Client wrapper error types.

/// Client wrapper errors.
///
/// Every failed call surfaces exactly one of these to the caller; the
/// token-clearing side effect for authorization failures has already
/// happened by the time the error is returned.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Transport-level failure (connection, DNS, protocol).
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },
}

impl Error {
    /// Whether this is an authorization failure (the stored token has been
    /// cleared and the auth-failure hook has fired).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Api { status: 401, .. })
    }
}
