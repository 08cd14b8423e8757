//! Archive storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// JSON-lines file receiving one record per finished session
    #[serde(default = "default_archive_path")]
    pub archive_path: PathBuf,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.archive_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyArchivePath);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            archive_path: default_archive_path(),
        }
    }
}

fn default_archive_path() -> PathBuf {
    PathBuf::from("dialogue_log.jsonl")
}
