//! Archive record written once per finished, deleted or reset session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::foundation::SessionId;

use super::condition::Condition;
use super::context::DonationContext;
use super::session::Session;
use super::strategy::round3;
use super::turn::TurnRecord;

/// What triggered archiving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveReason {
    Ended,
    Deleted,
    Reset,
}

impl fmt::Display for ArchiveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArchiveReason::Ended => "ended",
            ArchiveReason::Deleted => "deleted",
            ArchiveReason::Reset => "reset",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub condition: Condition,
    pub donation_context: DonationContext,
    pub turns: u32,
    pub outcome: Option<String>,
    pub final_belief: f64,
    pub final_trust: f64,
    pub belief_history: Vec<f64>,
    pub trust_history: Vec<f64>,
    pub strategy_weights: BTreeMap<String, f64>,
    pub history: Vec<TurnRecord>,
    pub started_at: DateTime<Utc>,
    pub archived_at: DateTime<Utc>,
    pub archive_reason: ArchiveReason,
}

impl SessionRecord {
    pub fn from_session(session: &Session, reason: ArchiveReason) -> Self {
        Self {
            session_id: session.id().clone(),
            condition: session.condition(),
            donation_context: session.context().clone(),
            turns: session.turn(),
            outcome: session.outcome().map(str::to_string),
            final_belief: round3(session.belief().get()),
            final_trust: round3(session.trust().get()),
            belief_history: session.belief().history().iter().copied().map(round3).collect(),
            trust_history: session.trust().history().iter().copied().map(round3).collect(),
            strategy_weights: session.strategies().weights().rounded(),
            history: session.history().to_vec(),
            started_at: session.created_at(),
            archived_at: Utc::now(),
            archive_reason: reason,
        }
    }
}
