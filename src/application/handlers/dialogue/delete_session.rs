//! DeleteSession - archive and drop a session.

use crate::domain::foundation::SessionId;
use crate::domain::persuasion::ArchiveReason;

use super::manager::{DialogueError, DialogueManager};

#[derive(Debug, Clone)]
pub struct DeleteSessionCommand {
    pub session_id: SessionId,
}

impl DialogueManager {
    pub async fn delete_session(&self, cmd: DeleteSessionCommand) -> Result<(), DialogueError> {
        let session = self
            .store
            .delete(&cmd.session_id)
            .await?
            .ok_or_else(|| DialogueError::SessionNotFound(cmd.session_id.clone()))?;
        self.archive(&session, ArchiveReason::Deleted).await;

        tracing::info!(session_id = %cmd.session_id, "session deleted");
        Ok(())
    }
}
