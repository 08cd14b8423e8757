//! Response Synthesizer Port - natural-language generation for agent turns.
//!
//! Implementations may fail for any reason; the dialogue manager always has
//! a deterministic fallback, so errors never reach the end user.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::persuasion::{Condition, DonationContext, SentimentLabel, Strategy};

use super::ai_provider::AIError;

/// One user/agent exchange kept as prompt memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub user: String,
    pub agent: String,
}

/// Everything needed to phrase a persuasive reply.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub session_id: SessionId,
    pub condition: Condition,
    pub context: DonationContext,
    pub strategy: Strategy,
    pub user_message: String,
    pub turn: u32,
    pub max_turns: u32,
    pub is_recovery: bool,
    pub sentiment: SentimentLabel,
    /// Most recent exchanges, oldest first.
    pub recent: Vec<Exchange>,
}

/// Input for steering an off-topic message back to the campaign.
#[derive(Debug, Clone)]
pub struct RedirectRequest {
    pub session_id: SessionId,
    pub context: DonationContext,
    pub user_message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("provider error: {0}")]
    Provider(#[from] AIError),

    #[error("synthesizer produced an empty reply")]
    Empty,

    #[error("synthesis unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ResponseSynthesizer: Send + Sync {
    /// Produces the agent reply for an on-topic turn.
    async fn generate(&self, request: &SynthesisRequest) -> Result<String, SynthesisError>;

    /// Produces a polite redirect for an off-topic turn.
    async fn redirect(&self, request: &RedirectRequest) -> Result<String, SynthesisError>;
}
