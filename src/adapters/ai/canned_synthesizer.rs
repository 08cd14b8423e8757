//! Deterministic synthesizer for offline runs and tests.

use async_trait::async_trait;

use crate::domain::persuasion::messages;
use crate::ports::{RedirectRequest, ResponseSynthesizer, SynthesisError, SynthesisRequest};

/// Replies with the fixed per-strategy texts, never calling a model.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedResponseSynthesizer;

impl CannedResponseSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResponseSynthesizer for CannedResponseSynthesizer {
    async fn generate(&self, request: &SynthesisRequest) -> Result<String, SynthesisError> {
        Ok(messages::fallback(
            request.strategy,
            request.condition,
            request.is_recovery,
            &request.context,
        ))
    }

    async fn redirect(&self, request: &RedirectRequest) -> Result<String, SynthesisError> {
        Ok(messages::off_topic_redirect(&request.context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::persuasion::{Condition, DonationContext, SentimentLabel, Strategy};

    #[tokio::test]
    async fn replies_match_fallback_texts() {
        let request = SynthesisRequest {
            session_id: SessionId::new("c-1").unwrap(),
            condition: Condition::C1,
            context: DonationContext::default(),
            strategy: Strategy::SocialProof,
            user_message: "hmm".to_string(),
            turn: 1,
            max_turns: 15,
            is_recovery: false,
            sentiment: SentimentLabel::Neutral,
            recent: Vec::new(),
        };
        let reply = CannedResponseSynthesizer::new().generate(&request).await.unwrap();
        assert!(reply.starts_with("Hundreds of people"));
    }
}
