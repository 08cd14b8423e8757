//! Tunable constants of the belief/trust/strategy dynamics.

use serde::{Deserialize, Serialize};

/// Numeric parameters shared by the trackers, strategy adapter and guardrails.
///
/// Defaults reproduce the reference experiment configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DialogueParams {
    pub initial_belief: f64,
    pub initial_trust: f64,
    /// Trust below this value puts the session into recovery mode.
    pub trust_threshold: f64,
    /// Belief learning rate.
    pub alpha: f64,
    /// Trust learning rate.
    pub beta: f64,
    /// Trust recovery rate toward the baseline while in recovery mode.
    pub gamma: f64,
    pub hard_rejection_penalty: f64,
    pub soft_rejection_penalty: f64,
    pub min_strategy_weight: f64,
    pub max_turns: u32,
    pub max_consecutive_rejections: u32,
    /// Trust-aware sessions end when trust falls below this value.
    pub low_trust_stop: f64,
}

impl Default for DialogueParams {
    fn default() -> Self {
        Self {
            initial_belief: 0.15,
            initial_trust: 0.9,
            trust_threshold: 0.5,
            alpha: 0.35,
            beta: 0.4,
            gamma: 0.15,
            hard_rejection_penalty: 0.6,
            soft_rejection_penalty: 0.35,
            min_strategy_weight: 0.05,
            max_turns: 15,
            max_consecutive_rejections: 3,
            low_trust_stop: 0.3,
        }
    }
}
