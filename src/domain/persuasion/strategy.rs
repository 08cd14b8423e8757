//! Persuasion strategies and the reactive weighting scheme over them.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

use super::rejection::RejectionType;

/// The closed set of rhetorical tactics the agent can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strategy {
    Empathy,
    Impact,
    SocialProof,
    Transparency,
    EthicalUrgency,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Empathy,
        Strategy::Impact,
        Strategy::SocialProof,
        Strategy::Transparency,
        Strategy::EthicalUrgency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Empathy => "Empathy",
            Strategy::Impact => "Impact",
            Strategy::SocialProof => "SocialProof",
            Strategy::Transparency => "Transparency",
            Strategy::EthicalUrgency => "EthicalUrgency",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ValidationError::invalid_format("strategy", format!("unknown strategy '{}'", s))
            })
    }
}

/// Weight per strategy. Always contains all five strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyWeights(BTreeMap<Strategy, f64>);

impl StrategyWeights {
    /// Every strategy starts at weight 1.0.
    pub fn uniform() -> Self {
        Self(Strategy::ALL.iter().map(|s| (*s, 1.0)).collect())
    }

    pub fn get(&self, strategy: Strategy) -> f64 {
        self.0.get(&strategy).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Strategy, f64)> + '_ {
        self.0.iter().map(|(s, w)| (*s, *w))
    }

    pub fn min(&self) -> f64 {
        self.0.values().copied().fold(f64::INFINITY, f64::min)
    }

    /// Weights rounded to three decimals, keyed by strategy name.
    pub fn rounded(&self) -> BTreeMap<String, f64> {
        self.0
            .iter()
            .map(|(s, w)| (s.as_str().to_string(), round3(*w)))
            .collect()
    }

    fn set(&mut self, strategy: Strategy, weight: f64) {
        self.0.insert(strategy, weight);
    }
}

impl Default for StrategyWeights {
    fn default() -> Self {
        Self::uniform()
    }
}

/// Reactive bandit-like adapter: shifts weight away from a strategy right
/// after it draws a rejection, never below the configured floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyAdapter {
    weights: StrategyWeights,
    hard_penalty: f64,
    soft_penalty: f64,
    floor: f64,
}

impl StrategyAdapter {
    pub fn new(hard_penalty: f64, soft_penalty: f64, floor: f64) -> Self {
        Self {
            weights: StrategyWeights::uniform(),
            hard_penalty,
            soft_penalty,
            floor,
        }
    }

    pub fn weights(&self) -> &StrategyWeights {
        &self.weights
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Samples a strategy proportionally to the current weights.
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> Strategy {
        let weights: Vec<f64> = Strategy::ALL.iter().map(|s| self.weights.get(*s)).collect();
        match WeightedIndex::new(&weights) {
            Ok(dist) => Strategy::ALL[dist.sample(rng)],
            Err(_) => Strategy::Empathy,
        }
    }

    /// Applies the rejection penalty for `rejection_type` to `strategy`.
    ///
    /// Returns the new weight. Ambiguous and non-rejections leave weights as is.
    pub fn penalize(&mut self, strategy: Strategy, rejection_type: RejectionType) -> f64 {
        let penalty = match rejection_type {
            RejectionType::Explicit => self.hard_penalty,
            RejectionType::Soft => self.soft_penalty,
            RejectionType::Ambiguous | RejectionType::None => 0.0,
        };
        let current = self.weights.get(strategy);
        let updated = (current - penalty).max(self.floor);
        self.weights.set(strategy, updated);
        updated
    }
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
