//! ResetSession - archive a session and restart it under the same id.

use crate::domain::foundation::SessionId;
use crate::domain::persuasion::{ArchiveReason, Session};

use super::manager::{DialogueError, DialogueManager};

#[derive(Debug, Clone)]
pub struct ResetSessionCommand {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResetSessionResult {
    pub session_id: SessionId,
    pub opening_message: String,
}

impl DialogueManager {
    /// The new session keeps the condition and donation context; all other
    /// state starts over.
    pub async fn reset_session(
        &self,
        cmd: ResetSessionCommand,
    ) -> Result<ResetSessionResult, DialogueError> {
        let old = self.load(&cmd.session_id).await?;
        self.archive(&old, ArchiveReason::Reset).await;

        let session = Session::start(
            old.id().clone(),
            old.condition(),
            old.context().clone(),
            &self.params,
        );
        let result = ResetSessionResult {
            session_id: session.id().clone(),
            opening_message: session.opening_message().to_string(),
        };
        self.store.put(session).await?;

        tracing::info!(session_id = %result.session_id, "session reset");
        Ok(result)
    }
}
