//! In-memory archive for tests and ephemeral runs.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::persuasion::SessionRecord;
use crate::ports::{ArchiveError, SessionArchive};

#[derive(Debug, Clone, Default)]
pub struct InMemorySessionArchive {
    records: Arc<RwLock<Vec<SessionRecord>>>,
}

impl InMemorySessionArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<SessionRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl SessionArchive for InMemorySessionArchive {
    async fn append(&self, record: &SessionRecord) -> Result<(), ArchiveError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }
}
