use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TkTicketStatus {
    Open,
    InProgress,
    Resolved,
}

impl TkTicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TkTicketStatus::Open => "open",
            TkTicketStatus::InProgress => "in_progress",
            TkTicketStatus::Resolved => "resolved",
        }
    }

    /// Parses the storage-layer tag; unknown tags yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(TkTicketStatus::Open),
            "in_progress" => Some(TkTicketStatus::InProgress),
            "resolved" => Some(TkTicketStatus::Resolved),
            _ => None,
        }
    }
}

impl fmt::Display for TkTicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public view of a ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TkTicketApi {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TkTicketStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /v1/tickets`.
#[derive(Debug, Deserialize, Serialize)]
pub struct TkTicketPost {
    pub title: String,
    pub description: String,
}

/// Body of `PUT /v1/tickets/{id}`.
#[derive(Debug, Deserialize, Serialize)]
pub struct TkTicketUpdate {
    pub title: String,
    pub description: String,
}

/// Body of `PUT /v1/tickets/{id}/status`.
#[derive(Debug, Deserialize, Serialize)]
pub struct TkTicketStatusUpdate {
    pub status: TkTicketStatus,
}

impl fmt::Display for TkTicketApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} (ID: {})", self.status, self.title, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tags_round_trip_through_storage_form() {
        for status in [
            TkTicketStatus::Open,
            TkTicketStatus::InProgress,
            TkTicketStatus::Resolved,
        ] {
            assert_eq!(TkTicketStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TkTicketStatus::parse("closed"), None);
    }

    #[test]
    fn status_update_parses_snake_case_tag() {
        let body = r#"{"status": "in_progress"}"#;
        let update: TkTicketStatusUpdate = serde_json::from_str(body).unwrap();
        assert_eq!(update.status, TkTicketStatus::InProgress);
    }
}
