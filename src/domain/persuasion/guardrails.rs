//! Termination policy over the turn counter and the rejection run.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::condition::Condition;
use super::params::DialogueParams;
use super::rejection::RejectionInfo;

/// Why a conversation was ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "limit", rename_all = "snake_case")]
pub enum StopReason {
    Accepted,
    Declined,
    UserEnded,
    MaxTurns(u32),
    TrustTooLow,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Accepted => f.write_str("User accepted"),
            StopReason::Declined => f.write_str("User declined donation"),
            StopReason::UserEnded => f.write_str("User ended conversation"),
            StopReason::MaxTurns(limit) => write!(f, "Max turns ({})", limit),
            StopReason::TrustTooLow => f.write_str("Trust too low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardrailDecision {
    pub should_stop: bool,
    pub reason: Option<StopReason>,
}

impl GuardrailDecision {
    fn stop(reason: StopReason) -> Self {
        Self {
            should_stop: true,
            reason: Some(reason),
        }
    }

    fn proceed() -> Self {
        Self {
            should_stop: false,
            reason: None,
        }
    }
}

/// Per-session stop policy. C1 only honors acceptance, repeated hard
/// refusals and the turn limit; C3 also honors single refusals, polite exits
/// after resistance and collapsed trust.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guardrails {
    condition: Condition,
    max_turns: u32,
    max_consecutive_rejections: u32,
    low_trust_stop: f64,
    turn: u32,
    consecutive_rejections: u32,
}

impl Guardrails {
    pub fn new(condition: Condition, params: &DialogueParams) -> Self {
        Self {
            condition,
            max_turns: params.max_turns,
            max_consecutive_rejections: params.max_consecutive_rejections,
            low_trust_stop: params.low_trust_stop,
            turn: 0,
            consecutive_rejections: 0,
        }
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn consecutive_rejections(&self) -> u32 {
        self.consecutive_rejections
    }

    /// Counts one classified turn and decides whether to stop.
    pub fn check(&mut self, info: &RejectionInfo, trust: f64, belief: f64) -> GuardrailDecision {
        self.turn += 1;
        if info.is_rejection() {
            self.consecutive_rejections += 1;
        } else {
            self.consecutive_rejections = 0;
        }

        tracing::debug!(
            condition = %self.condition,
            turn = self.turn,
            consecutive_rejections = self.consecutive_rejections,
            rejection_type = %info.rejection_type,
            polite_exit = info.is_polite_exit,
            trust,
            belief,
            "guardrail check"
        );

        let trust_aware = self.condition.is_trust_aware();
        let run_exhausted = self.consecutive_rejections >= self.max_consecutive_rejections;

        if info.is_acceptance {
            return GuardrailDecision::stop(StopReason::Accepted);
        }
        if info.is_hard_refusal() && (trust_aware || run_exhausted) {
            return GuardrailDecision::stop(StopReason::Declined);
        }
        if trust_aware && run_exhausted {
            return GuardrailDecision::stop(StopReason::Declined);
        }
        if trust_aware && info.is_polite_exit && self.consecutive_rejections >= 2 {
            return GuardrailDecision::stop(StopReason::UserEnded);
        }
        if self.turn >= self.max_turns {
            return GuardrailDecision::stop(StopReason::MaxTurns(self.max_turns));
        }
        if trust_aware && trust < self.low_trust_stop {
            return GuardrailDecision::stop(StopReason::TrustTooLow);
        }
        GuardrailDecision::proceed()
    }

    /// Counts an off-topic turn. Only the turn limit applies and the
    /// rejection run is left as it was.
    pub fn check_off_topic(&mut self) -> GuardrailDecision {
        self.turn += 1;
        if self.turn >= self.max_turns {
            return GuardrailDecision::stop(StopReason::MaxTurns(self.max_turns));
        }
        GuardrailDecision::proceed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::persuasion::rejection::RejectionType;

    fn guardrails(condition: Condition) -> Guardrails {
        Guardrails::new(condition, &DialogueParams::default())
    }

    fn explicit() -> RejectionInfo {
        RejectionInfo {
            rejection_type: RejectionType::Explicit,
            rejection_confidence: 0.9,
            ..RejectionInfo::default()
        }
    }

    fn soft() -> RejectionInfo {
        RejectionInfo {
            rejection_type: RejectionType::Soft,
            rejection_confidence: 0.7,
            ..RejectionInfo::default()
        }
    }

    #[test]
    fn acceptance_wins_over_everything() {
        let mut g = guardrails(Condition::C3);
        let info = RejectionInfo {
            is_acceptance: true,
            trust_concern: true,
            ..RejectionInfo::default()
        };
        let decision = g.check(&info, 0.1, 0.9);
        assert_eq!(decision.reason, Some(StopReason::Accepted));
    }

    #[test]
    fn c3_stops_on_first_hard_refusal_and_stays_stopped() {
        let mut g = guardrails(Condition::C3);
        let first = g.check(&explicit(), 0.9, 0.1);
        assert!(first.should_stop);
        assert_eq!(first.reason, Some(StopReason::Declined));

        let second = g.check(&explicit(), 0.9, 0.1);
        assert_eq!(second, first);
    }

    #[test]
    fn c1_needs_three_consecutive_hard_refusals() {
        let mut g = guardrails(Condition::C1);
        assert!(!g.check(&explicit(), 0.9, 0.1).should_stop);
        assert!(!g.check(&explicit(), 0.9, 0.1).should_stop);
        let third = g.check(&explicit(), 0.9, 0.1);
        assert_eq!(third.reason, Some(StopReason::Declined));
        assert_eq!(g.turn(), 3);
    }

    #[test]
    fn c3_stops_after_three_soft_rejections() {
        let mut g = guardrails(Condition::C3);
        assert!(!g.check(&soft(), 0.9, 0.1).should_stop);
        assert!(!g.check(&soft(), 0.9, 0.1).should_stop);
        assert_eq!(g.check(&soft(), 0.9, 0.1).reason, Some(StopReason::Declined));
    }

    #[test]
    fn c1_ignores_soft_rejection_runs() {
        let mut g = guardrails(Condition::C1);
        for _ in 0..5 {
            assert!(!g.check(&soft(), 0.9, 0.1).should_stop);
        }
    }

    #[test]
    fn non_rejection_resets_the_run() {
        let mut g = guardrails(Condition::C3);
        g.check(&soft(), 0.9, 0.1);
        g.check(&soft(), 0.9, 0.1);
        g.check(&RejectionInfo::default(), 0.9, 0.1);
        assert_eq!(g.consecutive_rejections(), 0);
        assert!(!g.check(&soft(), 0.9, 0.1).should_stop);
    }

    #[test]
    fn polite_exit_after_resistance_ends_c3() {
        let mut g = guardrails(Condition::C3);
        g.check(&soft(), 0.9, 0.2);
        let info = RejectionInfo {
            is_polite_exit: true,
            ..explicit()
        };
        let decision = g.check(&info, 0.8, 0.1);
        assert_eq!(decision.reason, Some(StopReason::UserEnded));
        assert_eq!(decision.reason.map(|r| r.to_string()).as_deref(), Some("User ended conversation"));
    }

    #[test]
    fn polite_exit_without_resistance_continues() {
        let mut g = guardrails(Condition::C3);
        let info = RejectionInfo {
            is_polite_exit: true,
            ..soft()
        };
        assert!(!g.check(&info, 0.9, 0.2).should_stop);
    }

    #[test]
    fn c1_ignores_polite_exits() {
        let mut g = guardrails(Condition::C1);
        g.check(&soft(), 0.9, 0.2);
        let info = RejectionInfo {
            is_polite_exit: true,
            ..explicit()
        };
        assert!(!g.check(&info, 0.9, 0.1).should_stop);
    }

    #[test]
    fn max_turns_stops_any_mode() {
        for condition in [Condition::C1, Condition::C3] {
            let mut g = guardrails(condition);
            for _ in 0..14 {
                assert!(!g.check(&RejectionInfo::default(), 0.9, 0.2).should_stop);
            }
            let last = g.check(&RejectionInfo::default(), 0.9, 0.2);
            assert_eq!(last.reason, Some(StopReason::MaxTurns(15)));
            assert!(last.reason.map(|r| r.to_string()).unwrap_or_default().contains("Max turns"));
        }
    }

    #[test]
    fn low_trust_only_stops_c3() {
        let mut c3 = guardrails(Condition::C3);
        assert_eq!(
            c3.check(&RejectionInfo::default(), 0.2, 0.2).reason,
            Some(StopReason::TrustTooLow)
        );
        let mut c1 = guardrails(Condition::C1);
        assert!(!c1.check(&RejectionInfo::default(), 0.2, 0.2).should_stop);
    }

    #[test]
    fn off_topic_turns_count_toward_the_limit_only() {
        let mut g = guardrails(Condition::C3);
        g.check(&soft(), 0.9, 0.2);
        for _ in 0..13 {
            assert!(!g.check_off_topic().should_stop);
        }
        assert_eq!(g.consecutive_rejections(), 1);
        assert_eq!(g.check_off_topic().reason, Some(StopReason::MaxTurns(15)));
    }

    #[test]
    fn stop_reasons_render_fixed_text() {
        assert_eq!(StopReason::Accepted.to_string(), "User accepted");
        assert_eq!(StopReason::Declined.to_string(), "User declined donation");
        assert_eq!(StopReason::MaxTurns(15).to_string(), "Max turns (15)");
        assert_eq!(StopReason::TrustTooLow.to_string(), "Trust too low");
    }
}
