//! ProcessMessage - run one user utterance through the turn pipeline.

use crate::domain::foundation::{SessionId, ValidationError};
use crate::domain::persuasion::{
    messages, ArchiveReason, GuardrailDecision, Session, Strategy, TurnDeltas, TurnResult,
};
use crate::ports::{RedirectRequest, SynthesisRequest};

use super::manager::{recent_exchanges, DialogueError, DialogueManager, PROMPT_MEMORY};

#[derive(Debug, Clone)]
pub struct ProcessMessageCommand {
    pub session_id: SessionId,
    pub message: String,
}

impl DialogueManager {
    /// Off-topic check, classification, tracker updates, guardrails, strategy
    /// selection and reply synthesis for one user message.
    ///
    /// An ended session answers with its closing message again and is left
    /// untouched.
    pub async fn process(&self, cmd: ProcessMessageCommand) -> Result<TurnResult, DialogueError> {
        let text = cmd.message.trim();
        if text.is_empty() {
            return Err(ValidationError::empty_field("message").into());
        }
        let mut session = self.load(&cmd.session_id).await?;

        if !session.is_active() {
            tracing::debug!(session_id = %session.id(), "message for ended session");
            return Ok(result(&session, session.closing_message(), TurnDeltas::default()));
        }

        let verdict = self.detectors.for_context(session.context()).detect(text);
        if verdict.is_off_topic {
            tracing::debug!(
                session_id = %session.id(),
                confidence = verdict.confidence,
                reason = %verdict.reason,
                "off-topic message"
            );
            let decision = session.apply_off_topic(text, verdict);
            if decision.should_stop {
                return self.finish(session, decision, TurnDeltas::default()).await;
            }
            let reply = self.redirect(&session, text).await;
            return self.commit(session, reply, TurnDeltas::default()).await;
        }

        let info = self.classifier.classify(text, &session.classification_context());
        let rejection_type = info.rejection_type;
        let sentiment = info.sentiment_label;
        let (deltas, decision) = session.apply_classification(text, info);
        if decision.should_stop {
            return self.finish(session, decision, deltas).await;
        }

        let strategy = {
            let mut rng = self.rng();
            session.next_strategy(rejection_type, &mut *rng)
        };
        let request = SynthesisRequest {
            session_id: session.id().clone(),
            condition: session.condition(),
            context: session.context().clone(),
            strategy,
            user_message: text.to_string(),
            turn: session.turn(),
            max_turns: self.params.max_turns,
            is_recovery: session.trust().is_recovery(),
            sentiment,
            recent: recent_exchanges(&session, PROMPT_MEMORY),
        };
        let reply = match self.synthesizer.generate(&request).await {
            Ok(reply) => Reply::generated(reply, Some(strategy)),
            Err(err) => {
                tracing::warn!(
                    session_id = %session.id(),
                    strategy = %strategy,
                    error = %err,
                    "synthesis failed, using fallback"
                );
                Reply::fallback(
                    messages::fallback(
                        strategy,
                        session.condition(),
                        request.is_recovery,
                        session.context(),
                    ),
                    Some(strategy),
                )
            }
        };
        self.commit(session, reply, deltas).await
    }

    async fn redirect(&self, session: &Session, text: &str) -> Reply {
        let request = RedirectRequest {
            session_id: session.id().clone(),
            context: session.context().clone(),
            user_message: text.to_string(),
        };
        match self.synthesizer.redirect(&request).await {
            Ok(reply) => Reply::generated(reply, None),
            Err(err) => {
                tracing::warn!(
                    session_id = %session.id(),
                    error = %err,
                    "redirect synthesis failed, using fallback"
                );
                Reply::fallback(messages::off_topic_redirect(session.context()), None)
            }
        }
    }

    async fn commit(
        &self,
        mut session: Session,
        reply: Reply,
        deltas: TurnDeltas,
    ) -> Result<TurnResult, DialogueError> {
        session.record_agent(reply.text.clone(), reply.strategy, reply.fallback);
        let result = result(&session, reply.text, deltas);
        self.store.put(session).await?;
        Ok(result)
    }

    /// Ends the session with a closing message and archives it.
    async fn finish(
        &self,
        mut session: Session,
        decision: GuardrailDecision,
        deltas: TurnDeltas,
    ) -> Result<TurnResult, DialogueError> {
        if let Some(reason) = decision.reason {
            session.end(reason)?;
        }
        let closing = session.closing_message();
        session.record_agent(closing.clone(), None, false);

        tracing::info!(
            session_id = %session.id(),
            outcome = session.outcome().unwrap_or_default(),
            turn = session.turn(),
            "session ended"
        );
        self.archive(&session, ArchiveReason::Ended).await;

        let result = result(&session, closing, deltas);
        self.store.put(session).await?;
        Ok(result)
    }
}

struct Reply {
    text: String,
    strategy: Option<Strategy>,
    fallback: bool,
}

impl Reply {
    fn generated(text: String, strategy: Option<Strategy>) -> Self {
        Self {
            text,
            strategy,
            fallback: false,
        }
    }

    fn fallback(text: String, strategy: Option<Strategy>) -> Self {
        Self {
            text,
            strategy,
            fallback: true,
        }
    }
}

fn result(session: &Session, agent_msg: String, deltas: TurnDeltas) -> TurnResult {
    TurnResult {
        agent_msg,
        metrics: session.metrics(deltas),
        stop: !session.is_active(),
        reason: session.outcome().map(str::to_string),
        history: session.history().to_vec(),
    }
}
