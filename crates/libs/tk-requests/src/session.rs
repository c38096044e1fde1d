//! Client-side session state.

use std::sync::RwLock;

/// Holds the single stored session token.
///
/// An explicit session-state object with controlled read/write/clear
/// operations, injected into [`crate::ApiClient`] instead of living in
/// ambient global storage. Clearing an already-cleared token is a no-op, so
/// concurrent 401s racing through [`clear`](Self::clear) stay safe.
#[derive(Debug, Default)]
pub struct SessionStore {
    token: RwLock<Option<String>>,
}

impl SessionStore {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored token, if any.
    pub fn token(&self) -> Option<String> {
        self.token.read().expect("session lock poisoned").clone()
    }

    /// Stores a token, replacing any previous one.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().expect("session lock poisoned") = Some(token.into());
    }

    /// Drops the stored token.
    pub fn clear(&self) {
        *self.token.write().expect("session lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_lifecycle() {
        let session = SessionStore::new();
        assert_eq!(session.token(), None);

        session.set_token("t1");
        assert_eq!(session.token(), Some(String::from("t1")));

        session.set_token("t2");
        assert_eq!(session.token(), Some(String::from("t2")));

        session.clear();
        session.clear();
        assert_eq!(session.token(), None);
    }
}
