//! End-to-end dialogue scenarios run through the DialogueManager.
//!
//! These tests wire the manager to the in-memory store and archive with
//! canned replies, so every run is deterministic given the seed.

use std::sync::Arc;

use atlas_dialogue::adapters::ai::CannedResponseSynthesizer;
use atlas_dialogue::adapters::storage::{InMemorySessionArchive, InMemorySessionStore};
use atlas_dialogue::application::handlers::{
    CreateSessionCommand, DialogueManager, GetMetricsQuery, ProcessMessageCommand,
};
use atlas_dialogue::domain::foundation::SessionId;
use atlas_dialogue::domain::persuasion::{
    ArchiveReason, Condition, DonationContext, RejectionType, TurnResult,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Fixture {
    manager: DialogueManager,
    archive: InMemorySessionArchive,
}

fn fixture() -> Fixture {
    let archive = InMemorySessionArchive::new();
    let manager = DialogueManager::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(archive.clone()),
        Arc::new(CannedResponseSynthesizer::new()),
    )
    .with_seed(42);
    Fixture { manager, archive }
}

async fn open(manager: &DialogueManager, condition: Condition) -> SessionId {
    manager
        .create_session(CreateSessionCommand {
            condition,
            context: DonationContext::default(),
        })
        .await
        .unwrap()
        .session_id
}

async fn send(manager: &DialogueManager, id: &SessionId, message: &str) -> TurnResult {
    manager
        .process(ProcessMessageCommand {
            session_id: id.clone(),
            message: message.to_string(),
        })
        .await
        .unwrap()
}

// =============================================================================
// Stop policy
// =============================================================================

#[tokio::test]
async fn polite_exit_after_soft_rejection_ends_trust_aware_session() {
    let f = fixture();
    let id = open(&f.manager, Condition::C3).await;

    let first = send(&f.manager, &id, "Maybe later").await;
    assert!(!first.stop);
    assert_eq!(first.metrics.rejection_type, RejectionType::Soft);

    let second = send(&f.manager, &id, "No thanks, I have to go now").await;
    assert!(second.stop);
    assert_eq!(second.reason.as_deref(), Some("User ended conversation"));
    assert!(!second.metrics.active);
}

#[tokio::test]
async fn repeated_refusals_diverge_by_condition() {
    let f = fixture();
    let c3 = open(&f.manager, Condition::C3).await;
    let c1 = open(&f.manager, Condition::C1).await;

    let result = send(&f.manager, &c3, "No, I won't donate").await;
    assert!(result.stop);
    assert_eq!(result.metrics.turn, 1);
    assert_eq!(result.reason.as_deref(), Some("User declined donation"));

    assert!(!send(&f.manager, &c1, "No, I won't donate").await.stop);
    assert!(!send(&f.manager, &c1, "No, I won't donate").await.stop);
    let third = send(&f.manager, &c1, "No, I won't donate").await;
    assert!(third.stop);
    assert_eq!(third.metrics.turn, 3);
    assert_eq!(third.reason.as_deref(), Some("User declined donation"));
}

#[tokio::test]
async fn neutral_conversation_stops_at_turn_limit() {
    for condition in [Condition::C1, Condition::C3] {
        let f = fixture();
        let id = open(&f.manager, condition).await;

        for _ in 0..14 {
            assert!(!send(&f.manager, &id, "I see what you mean").await.stop);
        }
        let last = send(&f.manager, &id, "I see what you mean").await;
        assert!(last.stop);
        assert_eq!(last.metrics.turn, 15);
        assert!(last.reason.unwrap_or_default().contains("Max turns"));
    }
}

#[tokio::test]
async fn acceptance_ends_and_archives_once() {
    let f = fixture();
    let id = open(&f.manager, Condition::C1).await;

    let result = send(&f.manager, &id, "Yes, I'll donate!").await;
    assert!(result.stop);
    assert_eq!(result.reason.as_deref(), Some("User accepted"));

    let again = send(&f.manager, &id, "Hello?").await;
    assert!(again.stop);
    assert_eq!(again.agent_msg, result.agent_msg);
    assert_eq!(again.metrics.turn, 1);

    let records = f.archive.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].archive_reason, ArchiveReason::Ended);
    assert_eq!(records[0].turns, 1);
}

#[tokio::test]
async fn agreeing_to_listen_does_not_end_trust_aware_session() {
    for reply in [
        "Sure, tell me more",
        "Yes, go ahead",
        "Sure",
        "Yeah what do you do?",
        "I've never heard of you, what do you do?",
    ] {
        let f = fixture();
        let id = open(&f.manager, Condition::C3).await;

        let result = send(&f.manager, &id, reply).await;
        assert!(!result.stop, "{reply}: {:?}", result.reason);
        assert!(result.metrics.active, "{reply}");
        assert_eq!(result.metrics.rejection_type, RejectionType::None, "{reply}");
        assert!(f.archive.records().await.is_empty(), "{reply}");
    }
}

#[tokio::test]
async fn plain_yes_to_the_pushy_ask_is_acceptance() {
    let f = fixture();
    let id = open(&f.manager, Condition::C1).await;

    let result = send(&f.manager, &id, "Yes").await;
    assert!(result.stop);
    assert_eq!(result.reason.as_deref(), Some("User accepted"));
}

#[tokio::test]
async fn how_it_works_question_is_answered_not_redirected() {
    let f = fixture();
    let id = open(&f.manager, Condition::C3).await;

    let result = send(&f.manager, &id, "Never donated before, how does it work?").await;
    assert!(!result.stop);
    assert!(!result.metrics.off_topic);
    assert!(result.metrics.is_curiosity);
    assert_eq!(result.metrics.rejection_type, RejectionType::None);
}

// =============================================================================
// Trust and off-topic handling
// =============================================================================

#[tokio::test]
async fn scam_question_flags_trust_concern_and_lowers_trust() {
    let f = fixture();
    let id = open(&f.manager, Condition::C3).await;

    let result = send(&f.manager, &id, "Is this a scam?").await;
    assert!(result.metrics.trust_concern);
    assert!(result.metrics.delta_trust < 0.0);
    assert!(result.metrics.trust < 0.9);
}

#[tokio::test]
async fn off_topic_message_is_redirected_without_moving_trackers() {
    let f = fixture();
    let id = open(&f.manager, Condition::C3).await;

    let result = send(&f.manager, &id, "What's the weather like today?").await;
    assert!(!result.stop);
    assert!(result.metrics.off_topic);
    assert_eq!(result.metrics.turn, 1);
    assert_eq!(result.metrics.delta_belief, 0.0);
    assert_eq!(result.metrics.delta_trust, 0.0);
    assert_eq!(result.metrics.belief_history, vec![0.15, 0.15]);
    assert_eq!(result.metrics.trust_history, vec![0.9, 0.9]);
}

// =============================================================================
// Invariants over a mixed conversation
// =============================================================================

#[tokio::test]
async fn metrics_stay_in_range_over_a_mixed_conversation() {
    let f = fixture();
    let id = open(&f.manager, Condition::C1).await;
    let script = [
        "Tell me more about the program",
        "Maybe later",
        "Is this a scam?",
        "What's the weather like today?",
        "How much of my money goes to the kids?",
        "I'm not sure",
        "I see what you mean",
    ];

    for (i, line) in script.iter().enumerate() {
        let result = send(&f.manager, &id, line).await;
        let m = &result.metrics;
        assert_eq!(m.turn as usize, i + 1);
        assert!((0.0..=1.0).contains(&m.belief));
        assert!((0.0..=1.0).contains(&m.trust));
        assert_eq!(m.belief_history.len(), i + 2);
        assert_eq!(m.trust_history.len(), i + 2);
        assert!(m.strategy_weights.values().all(|w| *w >= 0.05));
        assert!((0.0..=1.0).contains(&m.rejection_conf));
    }

    let metrics = f
        .manager
        .metrics(GetMetricsQuery { session_id: id })
        .await
        .unwrap();
    assert_eq!(metrics.turn, script.len() as u32);
    assert!(metrics.active);
}
