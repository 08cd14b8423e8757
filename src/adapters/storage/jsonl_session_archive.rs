//! JSONL Session Archive Adapter
//!
//! Appends one JSON object per line to a log file. The parent directory is
//! created on first write; existing lines are never touched.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::persuasion::SessionRecord;
use crate::ports::{ArchiveError, SessionArchive};

#[derive(Debug)]
pub struct JsonlSessionArchive {
    path: PathBuf,
    // Serializes appends so concurrent records never interleave.
    write_lock: Mutex<()>,
}

impl JsonlSessionArchive {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent(&self) -> Result<(), ArchiveError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
                .await
                .map_err(|e| ArchiveError::IoError(e.to_string())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl SessionArchive for JsonlSessionArchive {
    async fn append(&self, record: &SessionRecord) -> Result<(), ArchiveError> {
        let mut line = serde_json::to_string(record)
            .map_err(|e| ArchiveError::SerializationFailed(e.to_string()))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        self.ensure_parent().await?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| ArchiveError::IoError(e.to_string()))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| ArchiveError::IoError(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| ArchiveError::IoError(e.to_string()))?;

        tracing::debug!(
            session_id = %record.session_id,
            reason = %record.archive_reason,
            path = %self.path.display(),
            "session archived"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::persuasion::{
        ArchiveReason, Condition, DialogueParams, DonationContext, Session,
    };
    use tempfile::TempDir;

    fn record(id: &str, reason: ArchiveReason) -> SessionRecord {
        let session = Session::start(
            SessionId::new(id).unwrap(),
            Condition::C1,
            DonationContext::default(),
            &DialogueParams::default(),
        );
        SessionRecord::from_session(&session, reason)
    }

    #[tokio::test]
    async fn appends_one_line_per_record() {
        let dir = TempDir::new().unwrap();
        let archive = JsonlSessionArchive::new(dir.path().join("logs/dialogue_log.jsonl"));

        archive.append(&record("one", ArchiveReason::Ended)).await.unwrap();
        archive.append(&record("two", ArchiveReason::Deleted)).await.unwrap();

        let content = fs::read_to_string(archive.path()).await.unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: SessionRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.session_id.as_str(), "one");
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["archive_reason"], "deleted");
        assert_eq!(second["condition"], "C1");
    }

    #[tokio::test]
    async fn existing_content_is_preserved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.jsonl");
        fs::write(&path, "{\"legacy\":true}\n").await.unwrap();

        let archive = JsonlSessionArchive::new(&path);
        archive.append(&record("new", ArchiveReason::Reset)).await.unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        assert!(content.starts_with("{\"legacy\":true}\n"));
        assert_eq!(content.lines().count(), 2);
    }

    #[tokio::test]
    async fn unwritable_path_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let archive = JsonlSessionArchive::new(dir.path());
        let err = archive
            .append(&record("x", ArchiveReason::Ended))
            .await
            .unwrap_err();
        assert!(matches!(err, ArchiveError::IoError(_)));
    }
}
