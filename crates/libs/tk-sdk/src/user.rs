use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of a user account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TkUserApi {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

/// Full profile view, including the triage metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TkUserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: TkRole,
    pub skills: Vec<String>,
}

/// Role tag attached to every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TkRole {
    User,
    Moderator,
    Admin,
}

impl TkRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TkRole::User => "user",
            TkRole::Moderator => "moderator",
            TkRole::Admin => "admin",
        }
    }

    /// Parses the storage-layer tag; unknown tags yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(TkRole::User),
            "moderator" => Some(TkRole::Moderator),
            "admin" => Some(TkRole::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for TkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /v1/signup`.
#[derive(Debug, Deserialize, Serialize)]
pub struct TkSignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /v1/login`.
#[derive(Debug, Deserialize, Serialize)]
pub struct TkLoginRequest {
    pub email: String,
    pub password: String,
}

impl TkLoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        let email = email.into();
        let password = password.into();
        Self { email, password }
    }
}

/// Body of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TkUserLogin {
    pub success: bool,
    pub token: String,
    pub user: TkUserApi,
}

/// Body of a successful signup.
///
/// The server issues no token on this path; `token` stays optional for
/// clients talking to deployments that do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TkUserCreated {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Body of `POST /v1/users/update` (admin only).
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TkUserUpdateRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub role: Option<TkRole>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
}

impl fmt::Display for TkUserApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User '{}' (ID: {})", self.email, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_body_matches_wire_shape() {
        let body = r#"{
            "success": true,
            "token": "abc.def.ghi",
            "user": {"id": "7f8d2c90-5f6e-4b57-9f2a-1c2d3e4f5a6b", "email": "a@x.com", "name": null}
        }"#;
        let login: TkUserLogin = serde_json::from_str(body).unwrap();
        assert!(login.success);
        assert_eq!(login.user.email, "a@x.com");
    }

    #[test]
    fn signup_body_token_is_optional() {
        let body = r#"{"message": "User created", "userId": "7f8d2c90-5f6e-4b57-9f2a-1c2d3e4f5a6b"}"#;
        let created: TkUserCreated = serde_json::from_str(body).unwrap();
        assert_eq!(created.token, None);

        let serialized = serde_json::to_string(&created).unwrap();
        assert!(serialized.contains("userId"));
        assert!(!serialized.contains("token"));
    }

    #[test]
    fn role_tags_round_trip_through_storage_form() {
        for role in [TkRole::User, TkRole::Moderator, TkRole::Admin] {
            assert_eq!(TkRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(TkRole::parse("root"), None);
    }
}
