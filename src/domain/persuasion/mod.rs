//! Persuasion domain - belief/trust dynamics, classifiers, strategy
//! weighting and stop policy for a donation-solicitation dialogue.

mod condition;
mod context;
mod guardrails;
pub mod messages;
mod off_topic;
mod params;
mod patterns;
mod record;
mod rejection;
mod session;
mod strategy;
mod trackers;
mod turn;

pub use condition::Condition;
pub use context::DonationContext;
pub use guardrails::{GuardrailDecision, Guardrails, StopReason};
pub use off_topic::{
    KeywordOffTopicDetector, KeywordOffTopicDetectorFactory, OffTopicDetector,
    OffTopicDetectorFactory, OffTopicVerdict,
};
pub use params::DialogueParams;
pub use patterns::PatternTable;
pub use record::{ArchiveReason, SessionRecord};
pub use rejection::{
    is_donation_ask, ClassificationContext, RejectionClassifier, RejectionInfo, RejectionType,
    RuleBasedRejectionClassifier, SentimentLabel,
};
pub use session::{Session, TurnDeltas};
pub use strategy::{Strategy, StrategyAdapter, StrategyWeights};
pub use trackers::{BeliefTracker, TrustTracker};
pub use turn::{Speaker, TurnInfo, TurnMetrics, TurnRecord, TurnResult};
