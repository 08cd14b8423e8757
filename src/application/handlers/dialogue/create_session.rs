//! CreateSession - start a new dialogue with its opening message.

use crate::domain::foundation::SessionId;
use crate::domain::persuasion::{Condition, DonationContext, Session};

use super::manager::{DialogueError, DialogueManager};

#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub condition: Condition,
    pub context: DonationContext,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSessionResult {
    pub session_id: SessionId,
    pub opening_message: String,
    pub condition: Condition,
}

impl DialogueManager {
    pub async fn create_session(
        &self,
        cmd: CreateSessionCommand,
    ) -> Result<CreateSessionResult, DialogueError> {
        cmd.context.validate()?;
        let session = Session::start(SessionId::generate(), cmd.condition, cmd.context, &self.params);
        let result = CreateSessionResult {
            session_id: session.id().clone(),
            opening_message: session.opening_message().to_string(),
            condition: session.condition(),
        };
        self.store.put(session).await?;

        tracing::info!(
            session_id = %result.session_id,
            condition = %result.condition,
            "session created"
        );
        Ok(result)
    }
}
