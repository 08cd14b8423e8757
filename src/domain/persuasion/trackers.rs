//! Belief and trust scalars with bounded updates and full history.

use serde::{Deserialize, Serialize};

use super::rejection::{RejectionInfo, RejectionType, SentimentLabel};

/// Factor applied to downward trust moves while in recovery mode.
const RECOVERY_DAMPING: f64 = 0.5;

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Inclination of the user to donate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefTracker {
    value: f64,
    alpha: f64,
    history: Vec<f64>,
}

impl BeliefTracker {
    pub fn new(initial: f64, alpha: f64) -> Self {
        let value = clamp_unit(initial);
        Self {
            value,
            alpha,
            history: vec![value],
        }
    }

    pub fn get(&self) -> f64 {
        self.value
    }

    /// Every recorded value, oldest first, starting with the initial one.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Direction of the belief move in [-1, 1] for one classified turn.
    pub fn direction(info: &RejectionInfo) -> f64 {
        let mut direction = 0.0;
        if info.is_acceptance {
            direction += 1.0;
        } else if info.is_rejection() {
            direction -= info.rejection_confidence;
        }
        if info.is_curiosity {
            direction += 0.5;
        }
        if info.sentiment_label == SentimentLabel::Positive {
            direction += 0.25 * info.sentiment_score;
        }
        direction.clamp(-1.0, 1.0)
    }

    pub fn update(&mut self, info: &RejectionInfo) -> f64 {
        self.value = clamp_unit(self.value + self.alpha * Self::direction(info));
        self.history.push(self.value);
        self.value
    }

    /// Records a turn that leaves belief unchanged.
    pub fn hold(&mut self) -> f64 {
        self.history.push(self.value);
        self.value
    }
}

/// Confidence of the user in the solicitor's legitimacy.
///
/// Falling below `threshold` enters recovery mode: further drops are damped
/// and non-negative turns pull trust back toward `baseline` at rate `gamma`.
/// Recovery ends once trust is back at or above the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustTracker {
    value: f64,
    beta: f64,
    gamma: f64,
    threshold: f64,
    baseline: f64,
    recovery_mode: bool,
    history: Vec<f64>,
}

impl TrustTracker {
    pub fn new(initial: f64, beta: f64, gamma: f64, threshold: f64) -> Self {
        let value = clamp_unit(initial);
        Self {
            value,
            beta,
            gamma,
            threshold,
            baseline: value,
            recovery_mode: value < threshold,
            history: vec![value],
        }
    }

    pub fn get(&self) -> f64 {
        self.value
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn is_recovery(&self) -> bool {
        self.recovery_mode
    }

    pub fn direction(info: &RejectionInfo) -> f64 {
        let mut direction = 0.0;
        if info.trust_concern {
            direction -= 1.0;
        }
        direction -= match info.rejection_type {
            RejectionType::Explicit => 0.5,
            RejectionType::Soft => 0.25,
            RejectionType::Ambiguous => 0.2,
            RejectionType::None => 0.0,
        } * info.rejection_confidence;
        match info.sentiment_label {
            SentimentLabel::Negative => direction -= 0.3 * info.sentiment_score.abs(),
            SentimentLabel::Positive => direction += 0.3 * info.sentiment_score,
            SentimentLabel::Neutral => {}
        }
        if info.is_acceptance {
            direction += 0.5;
        }
        if info.is_curiosity {
            direction += 0.3;
        }
        direction.clamp(-1.0, 1.0)
    }

    pub fn update(&mut self, info: &RejectionInfo) -> f64 {
        let direction = Self::direction(info);
        let delta = if direction < 0.0 {
            let damping = if self.recovery_mode { RECOVERY_DAMPING } else { 1.0 };
            self.beta * direction * damping
        } else if self.recovery_mode {
            self.gamma * (self.baseline - self.value).max(0.0) + self.gamma * direction
        } else {
            self.beta * direction
        };
        self.value = clamp_unit(self.value + delta);
        self.history.push(self.value);

        if self.value < self.threshold {
            self.recovery_mode = true;
        } else if self.recovery_mode {
            self.recovery_mode = false;
        }
        self.value
    }

    /// Records a turn that leaves trust unchanged.
    pub fn hold(&mut self) -> f64 {
        self.history.push(self.value);
        self.value
    }
}
