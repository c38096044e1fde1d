//! Request context management for web handlers.
//!
//! The resolver turns a verified session token into a [`Ctx`] carried in
//! request extensions; protected handlers extract it to learn who is calling.

use uuid::Uuid;

pub mod resolver;

/// Request context of an authenticated call.
#[derive(Clone, Debug, PartialEq)]
pub struct Ctx {
    /// The authenticated user's ID, resolved from the session token.
    pub user_id: Uuid,
}

impl Ctx {
    /// Creates a new request context.
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}
