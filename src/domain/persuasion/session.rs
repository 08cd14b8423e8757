//! Session aggregate: all per-conversation state mutated turn by turn.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::domain::foundation::{SessionId, SessionStatus, StateMachine, ValidationError};

use super::condition::Condition;
use super::context::DonationContext;
use super::guardrails::{GuardrailDecision, Guardrails, StopReason};
use super::messages;
use super::off_topic::OffTopicVerdict;
use super::params::DialogueParams;
use super::rejection::{is_donation_ask, ClassificationContext, RejectionInfo, RejectionType};
use super::strategy::{round3, Strategy, StrategyAdapter};
use super::trackers::{BeliefTracker, TrustTracker};
use super::turn::{Speaker, TurnInfo, TurnMetrics, TurnRecord};

/// Belief/trust movement produced by one turn.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TurnDeltas {
    pub belief: f64,
    pub trust: f64,
}

#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    condition: Condition,
    context: DonationContext,
    status: SessionStatus,
    outcome: Option<String>,
    belief: BeliefTracker,
    trust: TrustTracker,
    strategies: StrategyAdapter,
    guardrails: Guardrails,
    history: Vec<TurnRecord>,
    last_rejection: Option<RejectionInfo>,
    last_strategy: Option<Strategy>,
    last_off_topic: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Session {
    /// Creates an active session and records the opening agent message.
    pub fn start(
        id: SessionId,
        condition: Condition,
        context: DonationContext,
        params: &DialogueParams,
    ) -> Self {
        let now = Utc::now();
        let opening = messages::opening(&context, condition);
        Self {
            id,
            condition,
            status: SessionStatus::Active,
            outcome: None,
            belief: BeliefTracker::new(params.initial_belief, params.alpha),
            trust: TrustTracker::new(
                params.initial_trust,
                params.beta,
                params.gamma,
                params.trust_threshold,
            ),
            strategies: StrategyAdapter::new(
                params.hard_rejection_penalty,
                params.soft_rejection_penalty,
                params.min_strategy_weight,
            ),
            guardrails: Guardrails::new(condition, params),
            history: vec![TurnRecord::agent(opening, None, false)],
            last_rejection: None,
            last_strategy: None,
            last_off_topic: false,
            context,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn context(&self) -> &DonationContext {
        &self.context
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn outcome(&self) -> Option<&str> {
        self.outcome.as_deref()
    }

    pub fn turn(&self) -> u32 {
        self.guardrails.turn()
    }

    pub fn belief(&self) -> &BeliefTracker {
        &self.belief
    }

    pub fn trust(&self) -> &TrustTracker {
        &self.trust
    }

    pub fn strategies(&self) -> &StrategyAdapter {
        &self.strategies
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn last_rejection(&self) -> Option<&RejectionInfo> {
        self.last_rejection.as_ref()
    }

    pub fn last_strategy(&self) -> Option<Strategy> {
        self.last_strategy
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The opening agent message.
    pub fn opening_message(&self) -> &str {
        self.history.first().map(|r| r.text.as_str()).unwrap_or_default()
    }

    /// Closing text for an ended session.
    pub fn closing_message(&self) -> String {
        messages::closing(self.outcome.as_deref().unwrap_or("Session ended"), &self.context)
    }

    pub fn classification_context(&self) -> ClassificationContext {
        ClassificationContext {
            turn: self.turn() + 1,
            consecutive_rejections: self.guardrails.consecutive_rejections(),
            donation_asked: self
                .history
                .iter()
                .rev()
                .find(|r| r.speaker == Speaker::Agent)
                .is_some_and(|r| is_donation_ask(&r.text)),
        }
    }

    /// Records a redirected user message. Trackers hold their values and
    /// strategy weights are untouched.
    pub fn apply_off_topic(&mut self, text: &str, verdict: OffTopicVerdict) -> GuardrailDecision {
        self.history.push(TurnRecord::user(text, TurnInfo::OffTopic(verdict)));
        self.belief.hold();
        self.trust.hold();
        self.last_off_topic = true;
        self.touch();
        self.guardrails.check_off_topic()
    }

    /// Records a classified user message and updates belief and trust.
    pub fn apply_classification(
        &mut self,
        text: &str,
        info: RejectionInfo,
    ) -> (TurnDeltas, GuardrailDecision) {
        let (belief_before, trust_before) = (self.belief.get(), self.trust.get());
        let belief = self.belief.update(&info);
        let trust = self.trust.update(&info);
        let decision = self.guardrails.check(&info, trust, belief);

        self.history.push(TurnRecord::user(text, TurnInfo::Classified(info.clone())));
        self.last_rejection = Some(info);
        self.last_off_topic = false;
        self.touch();
        (
            TurnDeltas {
                belief: belief - belief_before,
                trust: trust - trust_before,
            },
            decision,
        )
    }

    /// Penalizes the previous strategy for this turn's rejection, then samples
    /// the next one.
    pub fn next_strategy<R: Rng + ?Sized>(
        &mut self,
        rejection_type: RejectionType,
        rng: &mut R,
    ) -> Strategy {
        if let Some(previous) = self.last_strategy {
            self.strategies.penalize(previous, rejection_type);
        }
        let strategy = self.strategies.select(rng);
        self.last_strategy = Some(strategy);
        strategy
    }

    pub fn record_agent(&mut self, text: impl Into<String>, strategy: Option<Strategy>, fallback: bool) {
        self.history.push(TurnRecord::agent(text, strategy, fallback));
        self.touch();
    }

    /// Moves the session to its terminal state.
    pub fn end(&mut self, reason: StopReason) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SessionStatus::Ended)?;
        self.outcome = Some(reason.to_string());
        self.touch();
        Ok(())
    }

    pub fn metrics(&self, deltas: TurnDeltas) -> TurnMetrics {
        let info = self.last_rejection.clone().unwrap_or_default();
        TurnMetrics {
            turn: self.turn(),
            belief: round3(self.belief.get()),
            trust: round3(self.trust.get()),
            delta_belief: round3(deltas.belief),
            delta_trust: round3(deltas.trust),
            rejection_type: info.rejection_type,
            rejection_conf: round3(info.rejection_confidence),
            sentiment: info.sentiment_label,
            sentiment_score: round3(info.sentiment_score),
            trust_concern: info.trust_concern,
            is_curiosity: info.is_curiosity,
            recovery_mode: self.trust.is_recovery(),
            strategy_weights: self.strategies.weights().rounded(),
            consec_reject: self.guardrails.consecutive_rejections(),
            belief_history: self.belief.history().iter().copied().map(round3).collect(),
            trust_history: self.trust.history().iter().copied().map(round3).collect(),
            active: self.is_active(),
            outcome: self.outcome.clone(),
            off_topic: self.last_off_topic,
            strategy: self.last_strategy,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
