// Signed-in user held by the server.
//
// Populated when the UI hands over the identity provider's access token,
// cleared on sign-out, read by handlers that call the notes backend.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::dates::now_fixed_offset;

#[derive(Debug, Clone, Serialize)]
pub struct UserSession {
    pub email: String,
    #[serde(skip_serializing)]
    pub access_token: String,
    pub signed_in_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionHolder {
    inner: Arc<RwLock<Option<UserSession>>>,
}

impl SessionHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, email: impl Into<String>, access_token: impl Into<String>) -> UserSession {
        let session = UserSession {
            email: email.into(),
            access_token: access_token.into(),
            signed_in_at: now_fixed_offset(),
        };
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(session.clone());
        session
    }

    // Returns the session that was cleared, if any
    pub fn sign_out(&self) -> Option<UserSession> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        guard.take()
    }

    pub fn current(&self) -> Option<UserSession> {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.current().map(|s| s.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_then_out() {
        let holder = SessionHolder::new();
        assert!(holder.current().is_none());

        holder.sign_in("ada@example.com", "tok-1");
        assert_eq!(holder.access_token().as_deref(), Some("tok-1"));

        let cleared = holder.sign_out().unwrap();
        assert_eq!(cleared.email, "ada@example.com");
        assert!(holder.access_token().is_none());
        assert!(holder.sign_out().is_none());
    }

    #[test]
    fn clones_share_state() {
        let holder = SessionHolder::new();
        let reader = holder.clone();
        holder.sign_in("ada@example.com", "tok-2");
        assert_eq!(reader.access_token().as_deref(), Some("tok-2"));
    }

    #[test]
    fn token_is_not_serialized() {
        let holder = SessionHolder::new();
        let session = holder.sign_in("ada@example.com", "secret");
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("ada@example.com"));
    }
}
