//! In-memory login sessions keyed by random bearer tokens.
//!
//! Tokens are 32 random bytes, hex encoded. Each successful lookup slides
//! the expiry forward by the configured TTL.

use chrono::{DateTime, Duration, Utc};
use neuroscreen_common::{Role, User};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// The identity attached to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub role: Role,
}

impl From<User> for SessionUser {
    fn from(u: User) -> Self {
        Self { id: u.id, name: u.name, username: u.username, role: u.role }
    }
}

#[derive(Debug, Clone)]
struct SessionEntry {
    user: SessionUser,
    expires_at: DateTime<Utc>,
}

/// Thread-safe session table.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("ttl", &self.ttl)
            .field("sessions", &"<redacted>")
            .finish()
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self { sessions: RwLock::new(HashMap::new()), ttl }
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Start a session for `user` and return its token.
    pub async fn create(&self, user: SessionUser) -> String {
        let token = hex::encode(rand::random::<[u8; 32]>());
        let entry = SessionEntry { user, expires_at: self.expiry_from(Utc::now()) };
        self.sessions.write().await.insert(token.clone(), entry);
        token
    }

    /// Resolve a token, refreshing its expiry. Expired sessions are removed.
    pub async fn get(&self, token: &str) -> Option<SessionUser> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(token) {
            Some(entry) if entry.expires_at > now => {
                entry.expires_at = self.expiry_from(now);
                Some(entry.user.clone())
            }
            Some(_) => {
                sessions.remove(token);
                debug!("Session expired");
                None
            }
            None => None,
        }
    }

    /// End a session. Unknown tokens are ignored.
    pub async fn destroy(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Drop every expired session and return how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.expires_at > now);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn user(role: Role) -> SessionUser {
        SessionUser { id: 1, name: "Ana".into(), username: "ana".into(), role }
    }

    #[tokio::test]
    async fn test_create_get_destroy() {
        let store = SessionStore::new(Duration::minutes(5));
        let token = store.create(user(Role::User)).await;
        assert_eq!(token.len(), 64);
        assert_eq!(store.get(&token).await, Some(user(Role::User)));

        store.destroy(&token).await;
        assert_eq!(store.get(&token).await, None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let store = SessionStore::new(Duration::minutes(5));
        let a = store.create(user(Role::User)).await;
        let b = store.create(user(Role::Admin)).await;
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let store = SessionStore::new(Duration::milliseconds(-1));
        let token = store.create(user(Role::User)).await;
        assert_eq!(store.get(&token).await, None);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = SessionStore::new(Duration::milliseconds(-1));
        store.create(user(Role::User)).await;
        store.create(user(Role::Admin)).await;
        assert_eq!(store.purge_expired().await, 2);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_huge_ttl_saturates() {
        let store = SessionStore::new(Duration::MAX);
        let token = store.create(user(Role::User)).await;
        assert_eq!(store.get(&token).await, Some(user(Role::User)));
        assert_eq!(store.purge_expired().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let store = SessionStore::new(Duration::minutes(5));
        assert_eq!(store.get("deadbeef").await, None);
        store.destroy("deadbeef").await;
    }
}
