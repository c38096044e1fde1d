//! HTTP client wrapper for the Ticket-Desk API.
//!
//! Wraps reqwest with the session handling every caller needs: the stored
//! token is attached as a bearer credential to each outbound request, every
//! non-success response is turned into a single error, and an authorization
//! failure clears the session and fires the injected auth-failure hook (the
//! "back to the login view" side effect) before the caller sees the error.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tk_requests::ApiClient;
//! use tk_sdk::user::TkLoginRequest;
//!
//! # async fn example() -> Result<(), tk_requests::error::Error> {
//! let client = ApiClient::new("http://localhost:3000/v1");
//! let login = client.login(&TkLoginRequest::new("a@x.com", "p1")).await?;
//! println!("logged in as {}", login.user);
//! let tickets = client.tickets().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod prelude;
pub mod session;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;
use uuid::Uuid;

use crate::prelude::*;
use crate::session::SessionStore;
use tk_sdk::ticket::{TkTicketApi, TkTicketPost, TkTicketStatusUpdate, TkTicketUpdate};
use tk_sdk::user::{
    TkLoginRequest, TkSignupRequest, TkUserCreated, TkUserLogin, TkUserProfile,
    TkUserUpdateRequest,
};

const AUTH_HEADER_PREFIX: &str = "Bearer ";

/// Callback fired when the server rejects the session (401).
pub type AuthFailureHook = Box<dyn Fn() + Send + Sync>;

/// HTTP client for the Ticket-Desk API with session support.
pub struct ApiClient {
    url: String,
    client: reqwest::Client,
    session: Arc<SessionStore>,
    on_auth_failure: Option<AuthFailureHook>,
}

impl ApiClient {
    /// Creates a client with a fresh, empty session.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tk_requests::ApiClient;
    ///
    /// let client = ApiClient::new("http://localhost:3000/v1");
    /// ```
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_session(url, Arc::new(SessionStore::new()))
    }

    /// Creates a client around an existing session store.
    pub fn with_session(url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        let client = reqwest::ClientBuilder::new()
            .build()
            .expect("Failed to build reqwest Client");
        Self {
            url: url.into(),
            client,
            session,
            on_auth_failure: None,
        }
    }

    /// Installs the hook fired on authorization failures.
    ///
    /// Fire-and-forget from the caller's point of view: it runs before the
    /// error is returned and is not something to recover from.
    pub fn on_auth_failure(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_auth_failure = Some(Box::new(hook));
        self
    }

    /// The session store this client reads its token from.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Drops the stored token.
    pub fn logout(&self) {
        self.session.clear();
    }

    /// Constructs the full URL path for an endpoint.
    fn path(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.url)
    }

    /// Merges the bearer header iff a token is currently stored.
    fn apply_session(&self, req: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => req.header(
                header::AUTHORIZATION,
                format!("{AUTH_HEADER_PREFIX}{token}"),
            ),
            None => req,
        }
    }

    async fn send(&self, method: Method, endpoint: &str, body: Option<String>) -> Result<Response> {
        let mut req = self
            .client
            .request(method, self.path(endpoint))
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            req = req.body(body);
        }
        let response = self.apply_session(req).send().await?;
        self.check(response).await
    }

    /// Turns a non-success response into a single error.
    ///
    /// The error message comes from the structured body when one can be
    /// parsed, with a generic fallback otherwise. A 401 clears the session
    /// and fires the auth-failure hook before the error is returned.
    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<serde_json::Value>(&body).ok())
            .and_then(|body| {
                body.get("message")
                    .and_then(|m| m.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));

        if status == StatusCode::UNAUTHORIZED {
            debug!("Session rejected, clearing stored token");
            self.session.clear();
            if let Some(hook) = &self.on_auth_failure {
                hook();
            }
        }

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Makes a GET request to the specified endpoint.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.send(Method::GET, endpoint, None).await?;
        Ok(response.json().await?)
    }

    /// Makes a POST request with a JSON body and deserializes the response.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let payload = serde_json::to_string(body)?;
        let response = self.send(Method::POST, endpoint, Some(payload)).await?;
        Ok(response.json().await?)
    }

    /// Makes a PUT request with a JSON body and deserializes the response.
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let payload = serde_json::to_string(body)?;
        let response = self.send(Method::PUT, endpoint, Some(payload)).await?;
        Ok(response.json().await?)
    }

    /* Auth */

    /// Logs in and persists the returned token into the session.
    ///
    /// Nothing is retained on failure.
    pub async fn login(&self, credentials: &TkLoginRequest) -> Result<TkUserLogin> {
        let login: TkUserLogin = self.post("login", credentials).await?;
        self.session.set_token(login.token.clone());
        Ok(login)
    }

    /// Signs up; a token is persisted only when the response carries one.
    ///
    /// The server's signup path answers with the created user's ID and no
    /// token, so a login normally follows.
    pub async fn signup(&self, payload: &TkSignupRequest) -> Result<TkUserCreated> {
        let created: TkUserCreated = self.post("signup", payload).await?;
        if let Some(token) = &created.token {
            self.session.set_token(token.clone());
        }
        Ok(created)
    }

    /* Users */

    /// Fetches the caller's profile.
    pub async fn profile(&self) -> Result<TkUserProfile> {
        self.get("users/profile").await
    }

    /// Lists all users (admin only).
    pub async fn users(&self) -> Result<Vec<TkUserProfile>> {
        self.get("users").await
    }

    /// Updates a user's role/skills (admin only).
    pub async fn update_user(&self, payload: &TkUserUpdateRequest) -> Result<TkUserProfile> {
        self.post("users/update", payload).await
    }

    /* Tickets */

    /// Lists the tickets visible to the caller.
    pub async fn tickets(&self) -> Result<Vec<TkTicketApi>> {
        self.get("tickets").await
    }

    /// Fetches one ticket.
    pub async fn ticket(&self, id: &Uuid) -> Result<TkTicketApi> {
        self.get(&format!("tickets/{id}")).await
    }

    /// Opens a new ticket.
    pub async fn create_ticket(&self, payload: &TkTicketPost) -> Result<TkTicketApi> {
        self.post("tickets", payload).await
    }

    /// Updates a ticket's title and description.
    pub async fn update_ticket(&self, id: &Uuid, payload: &TkTicketUpdate) -> Result<TkTicketApi> {
        self.put(&format!("tickets/{id}"), payload).await
    }

    /// Updates a ticket's status.
    pub async fn update_ticket_status(
        &self,
        id: &Uuid,
        payload: &TkTicketStatusUpdate,
    ) -> Result<TkTicketApi> {
        self.put(&format!("tickets/{id}/status"), payload).await
    }
}
