//! Dialogue Command and Query Handlers
//!
//! ## Commands
//! - `CreateSession` - Start a session and record the opening message
//! - `ProcessMessage` - Run one user message through the turn pipeline
//! - `ResetSession` - Archive and restart a session under the same id
//! - `DeleteSession` - Archive and drop a session
//!
//! ## Queries
//! - `GetMetrics` - Current metrics snapshot

mod create_session;
mod delete_session;
mod get_metrics;
mod manager;
mod process_message;
mod reset_session;

pub use create_session::{CreateSessionCommand, CreateSessionResult};
pub use delete_session::DeleteSessionCommand;
pub use get_metrics::GetMetricsQuery;
pub use manager::{DialogueError, DialogueManager};
pub use process_message::ProcessMessageCommand;
pub use reset_session::{ResetSessionCommand, ResetSessionResult};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::ai::{
        CannedResponseSynthesizer, LlmResponseSynthesizer, MockAIProvider, MockError,
    };
    use crate::adapters::storage::{InMemorySessionArchive, InMemorySessionStore};
    use crate::domain::foundation::SessionId;
    use crate::domain::persuasion::{
        messages, ArchiveReason, Condition, DonationContext, Speaker, TurnInfo,
    };
    use crate::ports::ResponseSynthesizer;

    struct Harness {
        manager: DialogueManager,
        archive: InMemorySessionArchive,
    }

    fn harness_with(synthesizer: Arc<dyn ResponseSynthesizer>) -> Harness {
        let archive = InMemorySessionArchive::new();
        let manager = DialogueManager::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(archive.clone()),
            synthesizer,
        )
        .with_seed(7);
        Harness { manager, archive }
    }

    fn harness() -> Harness {
        harness_with(Arc::new(CannedResponseSynthesizer::new()))
    }

    async fn start(manager: &DialogueManager, condition: Condition) -> SessionId {
        manager
            .create_session(CreateSessionCommand {
                condition,
                context: DonationContext::default(),
            })
            .await
            .unwrap()
            .session_id
    }

    fn say(session_id: &SessionId, message: &str) -> ProcessMessageCommand {
        ProcessMessageCommand {
            session_id: session_id.clone(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn create_session_returns_opening_message() {
        let h = harness();
        let result = h
            .manager
            .create_session(CreateSessionCommand {
                condition: Condition::C3,
                context: DonationContext::default(),
            })
            .await
            .unwrap();
        assert_eq!(result.condition, Condition::C3);
        assert!(result.opening_message.contains("No pressure"));

        let metrics = h
            .manager
            .metrics(GetMetricsQuery {
                session_id: result.session_id,
            })
            .await
            .unwrap();
        assert_eq!(metrics.turn, 0);
        assert!(metrics.active);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let h = harness();
        let missing = SessionId::new("missing").unwrap();
        let err = h.manager.process(say(&missing, "hello")).await.unwrap_err();
        assert!(matches!(err, DialogueError::SessionNotFound(_)));

        let err = h
            .manager
            .delete_session(DeleteSessionCommand { session_id: missing })
            .await
            .unwrap_err();
        assert!(matches!(err, DialogueError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let h = harness();
        let id = start(&h.manager, Condition::C1).await;
        let err = h.manager.process(say(&id, "   ")).await.unwrap_err();
        assert!(matches!(err, DialogueError::Validation(_)));
    }

    #[tokio::test]
    async fn synthesis_failure_falls_back_to_canned_text() {
        let provider = Arc::new(
            MockAIProvider::new().with_error(MockError::Unavailable {
                message: "down".into(),
            }),
        );
        let h = harness_with(Arc::new(LlmResponseSynthesizer::new(provider)));
        let id = start(&h.manager, Condition::C3).await;

        let result = h.manager.process(say(&id, "I see what you mean")).await.unwrap();
        let strategy = result.metrics.strategy.unwrap();
        assert_eq!(
            result.agent_msg,
            messages::fallback(strategy, Condition::C3, false, &DonationContext::default())
        );
        let last = result.history.last().unwrap();
        assert_eq!(last.speaker, Speaker::Agent);
        assert!(matches!(last.info, Some(TurnInfo::Agent { fallback: true, .. })));
    }

    #[tokio::test]
    async fn ending_a_session_archives_it_once() {
        let h = harness();
        let id = start(&h.manager, Condition::C3).await;
        let result = h.manager.process(say(&id, "Yes, I'll donate!")).await.unwrap();
        assert!(result.stop);
        assert_eq!(result.reason.as_deref(), Some("User accepted"));

        let records = h.archive.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].archive_reason, ArchiveReason::Ended);
        assert_eq!(records[0].outcome.as_deref(), Some("User accepted"));
    }

    #[tokio::test]
    async fn reset_keeps_id_and_restarts_state() {
        let h = harness();
        let id = start(&h.manager, Condition::C1).await;
        h.manager.process(say(&id, "Maybe later")).await.unwrap();

        let reset = h
            .manager
            .reset_session(ResetSessionCommand {
                session_id: id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(reset.session_id, id);

        let metrics = h
            .manager
            .metrics(GetMetricsQuery { session_id: id })
            .await
            .unwrap();
        assert_eq!(metrics.turn, 0);
        assert_eq!(metrics.belief_history, vec![0.15]);
        assert_eq!(h.archive.records().await[0].archive_reason, ArchiveReason::Reset);
    }

    #[tokio::test]
    async fn delete_archives_and_removes() {
        let h = harness();
        let id = start(&h.manager, Condition::C3).await;
        h.manager
            .delete_session(DeleteSessionCommand {
                session_id: id.clone(),
            })
            .await
            .unwrap();

        assert_eq!(h.archive.records().await[0].archive_reason, ArchiveReason::Deleted);
        let err = h
            .manager
            .metrics(GetMetricsQuery { session_id: id })
            .await
            .unwrap_err();
        assert!(matches!(err, DialogueError::SessionNotFound(_)));
    }
}
