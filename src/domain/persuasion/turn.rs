//! Append-only conversation records and the per-turn result bundle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::off_topic::OffTopicVerdict;
use super::rejection::{RejectionInfo, RejectionType, SentimentLabel};
use super::strategy::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Agent,
}

/// Annotation attached to a turn record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnInfo {
    /// Classifier output for an on-topic user message.
    Classified(RejectionInfo),
    /// Verdict for a user message that was redirected.
    OffTopic(OffTopicVerdict),
    /// How an agent message was produced.
    Agent {
        strategy: Option<Strategy>,
        fallback: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub speaker: Speaker,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<TurnInfo>,
    pub timestamp: DateTime<Utc>,
}

impl TurnRecord {
    pub fn user(text: impl Into<String>, info: TurnInfo) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            info: Some(info),
            timestamp: Utc::now(),
        }
    }

    pub fn agent(text: impl Into<String>, strategy: Option<Strategy>, fallback: bool) -> Self {
        Self {
            speaker: Speaker::Agent,
            text: text.into(),
            info: Some(TurnInfo::Agent { strategy, fallback }),
            timestamp: Utc::now(),
        }
    }
}

/// Snapshot of session state after a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnMetrics {
    pub turn: u32,
    pub belief: f64,
    pub trust: f64,
    pub delta_belief: f64,
    pub delta_trust: f64,
    pub rejection_type: RejectionType,
    pub rejection_conf: f64,
    pub sentiment: SentimentLabel,
    pub sentiment_score: f64,
    pub trust_concern: bool,
    pub is_curiosity: bool,
    pub recovery_mode: bool,
    pub strategy_weights: BTreeMap<String, f64>,
    pub consec_reject: u32,
    pub belief_history: Vec<f64>,
    pub trust_history: Vec<f64>,
    pub active: bool,
    pub outcome: Option<String>,
    pub off_topic: bool,
    pub strategy: Option<Strategy>,
}

/// Everything a caller needs after submitting one user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub agent_msg: String,
    pub metrics: TurnMetrics,
    pub stop: bool,
    pub reason: Option<String>,
    pub history: Vec<TurnRecord>,
}
