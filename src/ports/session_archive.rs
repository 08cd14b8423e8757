//! Session Archive Port - append-only log of finished sessions.

use async_trait::async_trait;

use crate::domain::persuasion::SessionRecord;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Failed to serialize record: {0}")]
    SerializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

#[async_trait]
pub trait SessionArchive: Send + Sync {
    /// Appends one record. Records are never rewritten.
    async fn append(&self, record: &SessionRecord) -> Result<(), ArchiveError>;
}
