//! Session Store Port - keyed storage of live dialogue sessions.
//!
//! The store only guarantees map-level consistency. Callers serialize turns
//! for a given session id.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::persuasion::Session;

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError>;

    /// Inserts or replaces the session stored under its id.
    async fn put(&self, session: Session) -> Result<(), SessionStoreError>;

    /// Removes a session, returning it if it existed.
    async fn delete(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError>;

    async fn list_ids(&self) -> Result<Vec<SessionId>, SessionStoreError>;
}
