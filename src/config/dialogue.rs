//! Dialogue dynamics configuration

use serde::Deserialize;

use crate::domain::persuasion::DialogueParams;

use super::error::ValidationError;

/// Tunables for belief/trust dynamics, strategy weighting and guardrails.
///
/// Every field defaults to the value in [`DialogueParams::default`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    pub initial_belief: f64,
    pub initial_trust: f64,
    pub trust_threshold: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub hard_rejection_penalty: f64,
    pub soft_rejection_penalty: f64,
    pub min_strategy_weight: f64,
    pub max_turns: u32,
    pub max_consecutive_rejections: u32,
    pub low_trust_stop: f64,
}

impl DialogueConfig {
    pub fn params(&self) -> DialogueParams {
        DialogueParams {
            initial_belief: self.initial_belief,
            initial_trust: self.initial_trust,
            trust_threshold: self.trust_threshold,
            alpha: self.alpha,
            beta: self.beta,
            gamma: self.gamma,
            hard_rejection_penalty: self.hard_rejection_penalty,
            soft_rejection_penalty: self.soft_rejection_penalty,
            min_strategy_weight: self.min_strategy_weight,
            max_turns: self.max_turns,
            max_consecutive_rejections: self.max_consecutive_rejections,
            low_trust_stop: self.low_trust_stop,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let unit = [
            ("dialogue.initial_belief", self.initial_belief),
            ("dialogue.initial_trust", self.initial_trust),
            ("dialogue.trust_threshold", self.trust_threshold),
            ("dialogue.alpha", self.alpha),
            ("dialogue.beta", self.beta),
            ("dialogue.gamma", self.gamma),
            ("dialogue.hard_rejection_penalty", self.hard_rejection_penalty),
            ("dialogue.soft_rejection_penalty", self.soft_rejection_penalty),
            ("dialogue.low_trust_stop", self.low_trust_stop),
        ];
        for (field, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::OutOfRange {
                    field,
                    min: 0.0,
                    max: 1.0,
                    actual: value,
                });
            }
        }
        // The floor must leave room for five positive weights.
        if self.min_strategy_weight <= 0.0 || self.min_strategy_weight >= 0.2 {
            return Err(ValidationError::OutOfRange {
                field: "dialogue.min_strategy_weight",
                min: 0.0,
                max: 0.2,
                actual: self.min_strategy_weight,
            });
        }
        if self.max_turns == 0 {
            return Err(ValidationError::MustBePositive("dialogue.max_turns"));
        }
        if self.max_consecutive_rejections == 0 {
            return Err(ValidationError::MustBePositive(
                "dialogue.max_consecutive_rejections",
            ));
        }
        Ok(())
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        let p = DialogueParams::default();
        Self {
            initial_belief: p.initial_belief,
            initial_trust: p.initial_trust,
            trust_threshold: p.trust_threshold,
            alpha: p.alpha,
            beta: p.beta,
            gamma: p.gamma,
            hard_rejection_penalty: p.hard_rejection_penalty,
            soft_rejection_penalty: p.soft_rejection_penalty,
            min_strategy_weight: p.min_strategy_weight,
            max_turns: p.max_turns,
            max_consecutive_rejections: p.max_consecutive_rejections,
            low_trust_stop: p.low_trust_stop,
        }
    }
}
