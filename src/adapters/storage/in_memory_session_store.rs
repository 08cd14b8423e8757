//! In-Memory Session Store Adapter
//!
//! Holds live sessions in a map guarded by an async RwLock.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::domain::persuasion::Session;
use crate::ports::{SessionStore, SessionStoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Clear all stored sessions (useful for tests)
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn put(&self, session: Session) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .await
            .insert(session.id().clone(), session);
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.sessions.write().await.remove(id))
    }

    async fn list_ids(&self) -> Result<Vec<SessionId>, SessionStoreError> {
        let mut ids: Vec<SessionId> = self.sessions.read().await.keys().cloned().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::persuasion::{Condition, DialogueParams, DonationContext};

    fn session(id: &str) -> Session {
        Session::start(
            SessionId::new(id).unwrap(),
            Condition::C3,
            DonationContext::default(),
            &DialogueParams::default(),
        )
    }

    #[tokio::test]
    async fn put_then_get() {
        let store = InMemorySessionStore::new();
        store.put(session("a")).await.unwrap();

        let loaded = store.get(&SessionId::new("a").unwrap()).await.unwrap();
        assert_eq!(loaded.map(|s| s.turn()), Some(0));
        assert!(store.get(&SessionId::new("b").unwrap()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_replaces_existing() {
        let store = InMemorySessionStore::new();
        let mut s = session("a");
        store.put(s.clone()).await.unwrap();
        s.record_agent("second", None, true);
        store.put(s).await.unwrap();

        assert_eq!(store.len().await, 1);
        let loaded = store.get(&SessionId::new("a").unwrap()).await.unwrap().unwrap();
        assert_eq!(loaded.history().len(), 2);
    }

    #[tokio::test]
    async fn delete_returns_removed_session() {
        let store = InMemorySessionStore::new();
        store.put(session("a")).await.unwrap();
        store.put(session("b")).await.unwrap();

        let removed = store.delete(&SessionId::new("a").unwrap()).await.unwrap();
        assert!(removed.is_some());
        assert!(store.delete(&SessionId::new("a").unwrap()).await.unwrap().is_none());
        assert_eq!(store.list_ids().await.unwrap(), vec![SessionId::new("b").unwrap()]);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemorySessionStore::new();
        let other = store.clone();
        store.put(session("shared")).await.unwrap();
        assert!(!other.is_empty().await);
        other.clear().await;
        assert!(store.is_empty().await);
    }
}
